use crate::domain::property::PropertyRecord;

/// Owner account the built-in listings are seeded under.
pub const CATALOG_OWNER_ID: &str = "user_361g0w0bgM843cVdiNG4ZyL6Z1p";

/// The furnished rentals the leasing desk ships with.
pub fn builtin_properties() -> Vec<PropertyRecord> {
    vec![
        PropertyRecord::new("725012_1")
            .with_field("name", "Beautiful Centrally Located 1 Bdrm Monthly Rental")
            .with_field("nickname", "boulder")
            .with_field("address", "2610 Iris Avenue, Apt 107")
            .with_field("city", "Boulder")
            .with_field("state", "Colorado")
            .with_field("bedrooms", "1")
            .with_field("bathrooms", "1")
            .with_field("layout", "One bedroom apartment, fully furnished")
            .with_field("monthly_rent", "2200")
            .with_field("utilities_included", "true")
            .with_field("minimum_stay", "1")
            .with_field(
                "amenities",
                "Full kitchen,Washer/dryer in unit,WiFi included,Free parking,Air conditioning,Heating",
            )
            .with_field("pets", "Allowed (pet deposit required)")
            .with_field("smoking", "Not allowed")
            .with_field("available_from", "January 15, 2025")
            .with_field("available_until", "Open ended"),
        PropertyRecord::new("433442_1")
            .with_field("name", "Blue Door Studio Downtown Lander Loft")
            .with_field("nickname", "lander")
            .with_field("address", "744 Lincoln Street")
            .with_field("city", "Lander")
            .with_field("state", "Wyoming")
            .with_field("bedrooms", "Studio")
            .with_field("bathrooms", "1")
            .with_field("size_sqft", "800")
            .with_field("beds", "1 Queen Bed")
            .with_field(
                "layout",
                "Open concept craftsman loft with high ceilings and bohemian modern furniture",
            )
            .with_field("monthly_rent", "1200")
            .with_field("utilities_included", "true")
            .with_field("cleaning_fee", "100")
            .with_field("deposit", "1000")
            .with_field("pet_deposit", "400")
            .with_field("minimum_stay", "1")
            .with_field(
                "amenities",
                "Full kitchen with essentials,Washer/dryer in unit,WiFi included,Samsung Smart TV,\
                 Free parking on premises,Gym access,Air conditioning,Heating,Professional cleaning",
            )
            .with_field("pets", "Allowed ($400 refundable pet deposit)")
            .with_field("smoking", "Not allowed")
            .with_field("accessibility", "Stairs at entrance")
            .with_field("available_from", "Available now")
            .with_field("available_until", "Open ended"),
    ]
}

#[cfg(test)]
mod tests {
    use super::builtin_properties;
    use crate::listing::resolve;

    #[test]
    fn builtin_catalog_has_unique_ids_and_nicknames() {
        let properties = builtin_properties();
        assert_eq!(properties.len(), 2);
        assert_ne!(properties[0].id, properties[1].id);

        assert_eq!(resolve("boulder", &properties).map(|p| p.id.0.as_str()), Some("725012_1"));
        assert_eq!(resolve("lander", &properties).map(|p| p.id.0.as_str()), Some("433442_1"));
    }

    #[test]
    fn builtin_amenities_keep_every_item() {
        let properties = builtin_properties();
        let amenities = properties[1].fields.amenities().unwrap_or_default();
        assert_eq!(amenities.split(',').count(), 9);
    }
}
