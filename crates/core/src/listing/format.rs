use crate::domain::property::{PropertyFields, PropertyRecord};
use crate::listing::resolve::{is_studio, resolve};

pub const UNKNOWN_PROPERTY: &str = "Unknown Property";
pub const CONTACT_FOR_PRICING: &str = "Contact for pricing";
pub const LOAD_FAILURE: &str =
    "I'm sorry, I couldn't load property information right now. Please try again later.";
pub const NOT_FOUND_FOR_DATES: &str = "I couldn't find that property.";

/// One sentence per property: name, bedroom count, location, rent and availability.
pub fn summarize_all(records: &[PropertyRecord]) -> String {
    if records.is_empty() {
        return LOAD_FAILURE.to_string();
    }

    let sentences =
        records.iter().map(|record| summary_sentence(&record.fields)).collect::<Vec<_>>();
    format!("{}.", sentences.join(". "))
}

fn summary_sentence(fields: &PropertyFields) -> String {
    let name = fields.name().unwrap_or(UNKNOWN_PROPERTY);
    let mut sentence = format!("{name}, a {}", bedroom_label(fields));

    if let Some(location) = location(fields) {
        sentence.push_str(&format!(" in {location}"));
    }
    match fields.monthly_rent() {
        Some(rent) => sentence.push_str(&format!(" for {}/month", dollars(rent))),
        None => sentence.push_str(&format!(", {CONTACT_FOR_PRICING}")),
    }
    if let Some(available_from) = fields.available_from() {
        sentence.push_str(&format!(", {}", available_phrase(available_from)));
    }

    sentence
}

/// Full description of the property a query resolves to, or a hint listing what exists.
pub fn detail(query: &str, records: &[PropertyRecord]) -> String {
    match resolve(query, records) {
        Some(record) => describe(record),
        None => not_found(query, records),
    }
}

fn not_found(query: &str, records: &[PropertyRecord]) -> String {
    let opening = format!("I don't have a property matching \"{query}\".");
    if records.is_empty() {
        return format!(
            "{opening} I couldn't load our listings right now, so please try again later."
        );
    }

    let cities = records
        .iter()
        .map(|record| record.fields.city().unwrap_or("unknown"))
        .collect::<Vec<_>>();
    let nicknames =
        records.iter().filter_map(|record| record.fields.nickname()).collect::<Vec<_>>();

    let mut message = format!("{opening} We have places in {}.", cities.join(", "));
    if !nicknames.is_empty() {
        message.push_str(&format!(" You can ask about {}.", nicknames.join(", ")));
    }
    message
}

fn describe(record: &PropertyRecord) -> String {
    let fields = &record.fields;
    let mut sentences = Vec::new();

    let name = fields.name().unwrap_or(UNKNOWN_PROPERTY);
    let mut opening = name.to_string();
    if let Some(address) = fields.address() {
        opening.push_str(&format!(" is at {address}"));
        if let Some(location) = location(fields) {
            opening.push_str(&format!(", {location}"));
        }
    } else if let Some(location) = location(fields) {
        opening.push_str(&format!(" is in {location}"));
    }
    sentences.push(format!("{opening}."));

    let bathrooms = fields
        .bathrooms()
        .map(|count| format!(" with {count} {}", plural(count, "bathroom", "bathrooms")))
        .unwrap_or_default();
    sentences.push(format!("It's {}{bathrooms}.", article_bedroom_label(fields)));

    if let Some(layout) = fields.layout() {
        sentences.push(format!("Layout: {layout}."));
    }
    if let Some(beds) = fields.beds() {
        sentences.push(format!("Sleeping arrangements: {beds}."));
    }
    if let Some(size) = fields.size_sqft() {
        sentences.push(format!("It's about {size} square feet."));
    }

    match fields.monthly_rent() {
        Some(rent) if utilities_included(fields) => {
            sentences.push(format!("Rent is {} a month, utilities included.", dollars(rent)));
        }
        Some(rent) => sentences.push(format!("Rent is {} a month.", dollars(rent))),
        None => sentences.push(format!("{CONTACT_FOR_PRICING}.")),
    }

    let minimum_stay = fields.minimum_stay().unwrap_or("1");
    sentences.push(format!(
        "Minimum stay is {minimum_stay} {}.",
        plural(minimum_stay, "month", "months")
    ));

    if let Some(amenities) = fields.amenities() {
        sentences.push(format!("Amenities include {}.", amenity_list(amenities)));
    }
    if let Some(pets) = fields.pets() {
        sentences.push(format!("Pets: {pets}."));
    }
    if fields.smoking() == Some("Not allowed") {
        sentences.push("This is a non-smoking property.".to_string());
    }
    if let Some(accessibility) = fields.accessibility() {
        sentences.push(format!("Accessibility: {accessibility}."));
    }
    if let Some(window) = availability_window(fields) {
        sentences.push(format!("{window}."));
    }

    if let Some(deposit) = fields.deposit() {
        sentences.push(format!("The security deposit is {}.", dollars(deposit)));
    }
    if let Some(cleaning_fee) = fields.cleaning_fee() {
        sentences.push(format!("There is a {} cleaning fee.", dollars(cleaning_fee)));
    }
    if let Some(pet_deposit) = fields.pet_deposit() {
        sentences.push(format!("The pet deposit is {}.", dollars(pet_deposit)));
    }

    let mut lines = vec![sentences.join(" ")];
    lines.extend(
        record.extra_context.iter().map(|(key, value)| format!("{}: {value}", humanize_key(key))),
    );
    lines.join("\n")
}

/// Echoes the requested dates next to the listed availability.
///
/// Dates are not compared: a person confirms availability after an application,
/// so the answer points the renter there instead of saying yes or no.
pub fn check_availability(
    query: &str,
    move_in: &str,
    move_out: &str,
    records: &[PropertyRecord],
) -> String {
    let Some(record) = resolve(query, records) else {
        return NOT_FOUND_FOR_DATES.to_string();
    };
    let fields = &record.fields;

    let name = fields.name().unwrap_or("The property");
    let available_from = fields.available_from().unwrap_or("unknown");
    let available_until = fields.available_until().unwrap_or("open ended");
    let minimum_stay = fields.minimum_stay().unwrap_or("1");

    format!(
        "{name} is listed as {} until {}. \
         Minimum stay is {minimum_stay} {}. \
         Your dates: {move_in} to {move_out}. \
         Exact dates are confirmed by our team, so the best next step is to submit an application \
         and we'll get back to you within 24 to 48 hours.",
        available_phrase(available_from),
        available_until.to_lowercase(),
        plural(minimum_stay, "month", "months"),
    )
}

/// `wifi_info` -> `Wifi Info`.
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn bedroom_label(fields: &PropertyFields) -> String {
    match fields.bedrooms() {
        Some(bedrooms) if is_studio(bedrooms) => "studio".to_string(),
        Some(bedrooms) => bedroom_count(bedrooms),
        None => "rental".to_string(),
    }
}

fn article_bedroom_label(fields: &PropertyFields) -> String {
    match fields.bedrooms() {
        Some(bedrooms) if is_studio(bedrooms) => "a studio".to_string(),
        Some(bedrooms) => format!("a {}", bedroom_count(bedrooms)),
        None => "a furnished rental".to_string(),
    }
}

/// `2` -> `2 bedroom`; values that already name the unit are kept as stored.
fn bedroom_count(bedrooms: &str) -> String {
    let lowered = bedrooms.trim().to_lowercase();
    if lowered.ends_with("bedroom") || lowered.ends_with("bedrooms") {
        bedrooms.trim().to_string()
    } else {
        format!("{} bedroom", bedrooms.trim())
    }
}

fn location(fields: &PropertyFields) -> Option<String> {
    match (fields.city(), fields.state()) {
        (Some(city), Some(state)) => Some(format!("{city}, {state}")),
        (Some(city), None) => Some(city.to_string()),
        (None, Some(state)) => Some(state.to_string()),
        (None, None) => None,
    }
}

fn utilities_included(fields: &PropertyFields) -> bool {
    fields.utilities_included().is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

fn availability_window(fields: &PropertyFields) -> Option<String> {
    let until = fields.available_until().map(str::to_lowercase);
    match (fields.available_from().map(available_phrase), until) {
        (Some(from), Some(until)) => Some(format!("It's {from}, until {until}")),
        (Some(from), None) => Some(format!("It's {from}")),
        (None, Some(until)) => Some(format!("It's available until {until}")),
        (None, None) => None,
    }
}

/// `January 15, 2025` -> `available from january 15, 2025`; `Available now` -> `available now`.
fn available_phrase(available_from: &str) -> String {
    let lowered = available_from.trim().to_lowercase();
    if lowered.starts_with("available") {
        lowered
    } else {
        format!("available from {lowered}")
    }
}

fn amenity_list(amenities: &str) -> String {
    amenities
        .split(',')
        .map(str::trim)
        .filter(|amenity| !amenity.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn dollars(amount: &str) -> String {
    format!("${}", amount.trim().trim_start_matches('$'))
}

fn plural<'a>(count: &str, singular: &'a str, many: &'a str) -> &'a str {
    if count.trim() == "1" {
        singular
    } else {
        many
    }
}
