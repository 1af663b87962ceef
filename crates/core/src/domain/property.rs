use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Leading character that marks a key/value row as structured property metadata.
pub const SYSTEM_KEY_MARKER: char = '_';

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Structured metadata for one rental. Every member is optional; formatters
/// substitute their own placeholders for anything missing.
///
/// Values only get in through [`PropertyFields::set`], so a present value is never
/// blank. Serialized as a flat `attribute -> value` map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct PropertyFields {
    name: Option<String>,
    nickname: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    bedrooms: Option<String>,
    bathrooms: Option<String>,
    beds: Option<String>,
    layout: Option<String>,
    size_sqft: Option<String>,
    monthly_rent: Option<String>,
    utilities_included: Option<String>,
    minimum_stay: Option<String>,
    amenities: Option<String>,
    pets: Option<String>,
    smoking: Option<String>,
    accessibility: Option<String>,
    available_from: Option<String>,
    available_until: Option<String>,
    deposit: Option<String>,
    cleaning_fee: Option<String>,
    pet_deposit: Option<String>,
    /// System keys with no dedicated member. Kept for inspection, never rendered.
    unrecognized: BTreeMap<String, String>,
}

macro_rules! field_accessors {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(&self) -> Option<&str> {
                self.$field.as_deref()
            }
        )*
    };
}

impl PropertyFields {
    field_accessors!(
        name, nickname, address, city,
        state, bedrooms, bathrooms, beds,
        layout, size_sqft, monthly_rent, utilities_included,
        minimum_stay, amenities, pets, smoking,
        accessibility, available_from, available_until, deposit,
        cleaning_fee, pet_deposit,
    );

    pub fn unrecognized(&self) -> &BTreeMap<String, String> {
        &self.unrecognized
    }

    /// Stores `value` under the attribute called `key`.
    ///
    /// Blank values are dropped so that "present but empty" and "absent" read the
    /// same to every caller. `rent` is accepted as an alias of `monthly_rent`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }

        let slot = match key {
            "name" => &mut self.name,
            "nickname" => &mut self.nickname,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "bedrooms" => &mut self.bedrooms,
            "bathrooms" => &mut self.bathrooms,
            "beds" => &mut self.beds,
            "layout" => &mut self.layout,
            "size_sqft" => &mut self.size_sqft,
            "monthly_rent" | "rent" => &mut self.monthly_rent,
            "utilities_included" => &mut self.utilities_included,
            "minimum_stay" => &mut self.minimum_stay,
            "amenities" => &mut self.amenities,
            "pets" => &mut self.pets,
            "smoking" => &mut self.smoking,
            "accessibility" => &mut self.accessibility,
            "available_from" => &mut self.available_from,
            "available_until" => &mut self.available_until,
            "deposit" => &mut self.deposit,
            "cleaning_fee" => &mut self.cleaning_fee,
            "pet_deposit" => &mut self.pet_deposit,
            other => {
                self.unrecognized.insert(other.to_string(), value);
                return;
            }
        };
        *slot = Some(value);
    }

    /// Iterates the populated attributes as `(name, value)` pairs in a fixed order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("name", &self.name),
            ("nickname", &self.nickname),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("bedrooms", &self.bedrooms),
            ("bathrooms", &self.bathrooms),
            ("beds", &self.beds),
            ("layout", &self.layout),
            ("size_sqft", &self.size_sqft),
            ("monthly_rent", &self.monthly_rent),
            ("utilities_included", &self.utilities_included),
            ("minimum_stay", &self.minimum_stay),
            ("amenities", &self.amenities),
            ("pets", &self.pets),
            ("smoking", &self.smoking),
            ("accessibility", &self.accessibility),
            ("available_from", &self.available_from),
            ("available_until", &self.available_until),
            ("deposit", &self.deposit),
            ("cleaning_fee", &self.cleaning_fee),
            ("pet_deposit", &self.pet_deposit),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
    }
}

impl From<BTreeMap<String, String>> for PropertyFields {
    fn from(attributes: BTreeMap<String, String>) -> Self {
        let mut fields = Self::default();
        for (key, value) in attributes {
            fields.set(&key, value);
        }
        fields
    }
}

impl From<PropertyFields> for BTreeMap<String, String> {
    fn from(fields: PropertyFields) -> Self {
        let mut attributes = fields
            .entries()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<BTreeMap<_, _>>();
        attributes.extend(fields.unrecognized);
        attributes
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: PropertyId,
    pub fields: PropertyFields,
    pub extra_context: BTreeMap<String, String>,
}

impl PropertyRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: PropertyId(id.into()),
            fields: PropertyFields::default(),
            extra_context: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.set(key, value);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_context.insert(key.into(), value.into());
        self
    }

    /// Applies one key/value row: marked keys become fields, the rest free-form context.
    pub fn apply_row(&mut self, key: &str, value: impl Into<String>) {
        match key.strip_prefix(SYSTEM_KEY_MARKER) {
            Some(system_key) => self.fields.set(system_key, value),
            None => {
                self.extra_context.insert(key.to_string(), value.into());
            }
        }
    }

    /// Encodes the record back into `(key, value)` rows using the marker convention.
    pub fn to_rows(&self) -> Vec<(String, String)> {
        let mut rows = self
            .fields
            .entries()
            .map(|(key, value)| (format!("{SYSTEM_KEY_MARKER}{key}"), value.to_string()))
            .collect::<Vec<_>>();
        rows.extend(
            self.fields
                .unrecognized
                .iter()
                .map(|(key, value)| (format!("{SYSTEM_KEY_MARKER}{key}"), value.clone())),
        );
        rows.extend(self.extra_context.iter().map(|(key, value)| (key.clone(), value.clone())));
        rows
    }
}

/// One row of the key/value property table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRow {
    pub property_id: String,
    pub key: String,
    pub value: String,
}

impl PropertyRow {
    pub fn new(
        property_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self { property_id: property_id.into(), key: key.into(), value: value.into() }
    }
}

/// Groups key/value rows into records, in first-seen identifier order.
pub fn group_rows<I>(rows: I) -> Vec<PropertyRecord>
where
    I: IntoIterator<Item = PropertyRow>,
{
    let mut records: Vec<PropertyRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let position = *positions.entry(row.property_id).or_insert_with_key(|property_id| {
            records.push(PropertyRecord::new(property_id.clone()));
            records.len() - 1
        });
        if let Some(record) = records.get_mut(position) {
            record.apply_row(&row.key, row.value);
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::{group_rows, PropertyRecord, PropertyRow};

    #[test]
    fn marked_keys_become_fields_and_plain_keys_become_context() {
        let records = group_rows(vec![
            PropertyRow::new("p1", "_name", "Blue Door Loft"),
            PropertyRow::new("p1", "_city", "Lander"),
            PropertyRow::new("p1", "wifi_info", "5GHz network"),
        ]);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.fields.name(), Some("Blue Door Loft"));
        assert_eq!(record.fields.city(), Some("Lander"));
        assert_eq!(record.extra_context.get("wifi_info").map(String::as_str), Some("5GHz network"));
        assert!(!record.extra_context.contains_key("_name"));
    }

    #[test]
    fn groups_follow_first_seen_identifier_order() {
        let records = group_rows(vec![
            PropertyRow::new("b", "_name", "B"),
            PropertyRow::new("a", "_name", "A"),
            PropertyRow::new("b", "_city", "Boulder"),
        ]);

        let ids = records.iter().map(|record| record.id.0.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(records[0].fields.city(), Some("Boulder"));
    }

    #[test]
    fn unknown_system_keys_are_kept_out_of_context() {
        let records = group_rows(vec![PropertyRow::new("p1", "_parking_spots", "2")]);

        assert!(records[0].extra_context.is_empty());
        assert_eq!(
            records[0].fields.unrecognized().get("parking_spots").map(String::as_str),
            Some("2")
        );
    }

    #[test]
    fn blank_values_read_as_absent_and_rent_alias_is_accepted() {
        let record = PropertyRecord::new("s1").with_field("city", "   ").with_field("rent", "1800");

        assert_eq!(record.fields.city(), None);
        assert_eq!(record.fields.monthly_rent(), Some("1800"));
    }

    #[test]
    fn deserialized_blank_values_stay_absent() {
        let raw = r#"
            id = "a"
            extra_context = {}

            [fields]
            city = ""
            name = " "
            rent = "1800"
        "#;
        let record: PropertyRecord = toml::from_str(raw).expect("record deserializes");

        assert_eq!(record.fields.city(), None);
        assert_eq!(record.fields.name(), None);
        assert_eq!(record.fields.monthly_rent(), Some("1800"));
    }

    #[test]
    fn interleaved_rows_land_on_their_first_seen_record() {
        let rows = (0..200).map(|index| {
            let id = format!("p{}", index % 4);
            PropertyRow::new(id, format!("note_{index}"), "x")
        });

        let records = group_rows(rows);

        let ids = records.iter().map(|record| record.id.0.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3"]);
        assert!(records.iter().all(|record| record.extra_context.len() == 50));
        assert!(records[3].extra_context.contains_key("note_199"));
    }

    #[test]
    fn rows_encode_with_marker_and_regroup_to_the_same_record() {
        let record = PropertyRecord::new("p1")
            .with_field("name", "Iris Avenue 1 Bdrm")
            .with_field("monthly_rent", "2200")
            .with_context("parking", "One reserved spot");

        let rows = record
            .to_rows()
            .into_iter()
            .map(|(key, value)| PropertyRow::new("p1", key, value))
            .collect::<Vec<_>>();
        assert!(rows.iter().any(|row| row.key == "_monthly_rent"));
        assert!(rows.iter().any(|row| row.key == "parking"));

        assert_eq!(group_rows(rows), vec![record]);
    }
}
