use crate::domain::property::PropertyRecord;

/// Finds the first record that a free-text reference points at.
///
/// Matching is case-insensitive and first-match-wins in record order: each
/// record is tried against every rule before the next record is looked at, so
/// an earlier record matched by a weak rule (city substring) shadows a later
/// record matched by a strong one (exact nickname). Rules, per record:
///
/// 1. query equals the nickname
/// 2. query contains the city, or the city contains the query
/// 3. the name contains the query
/// 4. query contains the bedroom text, or the bedroom text contains the query
/// 5. "studio" in the query for a studio, "1"/"one" in the query for a one-bedroom
///
/// The query is only lower-cased, never trimmed. A blank query therefore still
/// matches: `""` is contained in any city, and `" "` in any multi-word name.
/// Absent attributes never match.
pub fn resolve<'a>(query: &str, records: &'a [PropertyRecord]) -> Option<&'a PropertyRecord> {
    let query = query.to_lowercase();
    records.iter().find(|record| matches_record(&query, record))
}

fn matches_record(query: &str, record: &PropertyRecord) -> bool {
    let fields = &record.fields;

    if fields.nickname().map(normalize).is_some_and(|nickname| nickname == query) {
        return true;
    }

    if let Some(city) = fields.city().map(normalize) {
        if query.contains(&city) || city.contains(query) {
            return true;
        }
    }

    if fields.name().map(normalize).is_some_and(|name| name.contains(query)) {
        return true;
    }

    let Some(bedrooms) = fields.bedrooms().map(normalize) else {
        return false;
    };
    if query.contains(&bedrooms) || bedrooms.contains(query) {
        return true;
    }

    if query.contains("studio") && is_studio(&bedrooms) {
        return true;
    }
    (query.contains('1') || query.contains("one")) && bedrooms == "1"
}

/// True when a bedroom count denotes a studio (`"studio"` or `"0"`).
pub fn is_studio(bedrooms: &str) -> bool {
    matches!(normalize(bedrooms).as_str(), "studio" | "0")
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
