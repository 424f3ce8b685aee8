//! Car groups, manufacturer and model-year extraction for "specific car" achievements

use once_cell::sync::Lazy;
use regex::Regex;

/// Curated sets of cars matched by case-insensitive keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarGroup {
    German,
    Japanese,
    AmericanMuscle,
    ItalianExotic,
    BritishLuxury,
    Electric,
    Suv,
    Sports,
    LuxurySedan,
    Supercar,
    Hypercar,
    Convertible,
    Truck,
}

impl CarGroup {
    pub const ALL: [CarGroup; 13] = [
        CarGroup::German,
        CarGroup::Japanese,
        CarGroup::AmericanMuscle,
        CarGroup::ItalianExotic,
        CarGroup::BritishLuxury,
        CarGroup::Electric,
        CarGroup::Suv,
        CarGroup::Sports,
        CarGroup::LuxurySedan,
        CarGroup::Supercar,
        CarGroup::Hypercar,
        CarGroup::Convertible,
        CarGroup::Truck,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::German => &["bmw", "mercedes", "audi", "porsche", "volkswagen", "maybach", "opel"],
            Self::Japanese => &[
                "toyota", "honda", "nissan", "mazda", "subaru", "lexus", "acura", "infiniti",
                "mitsubishi", "suzuki",
            ],
            Self::AmericanMuscle => &[
                "mustang", "camaro", "challenger", "charger", "chevelle", "pontiac gto", "firebird",
                "hellcat",
            ],
            Self::ItalianExotic => &["ferrari", "lamborghini", "maserati", "pagani"],
            Self::BritishLuxury => &["rolls-royce", "rolls royce", "bentley", "aston martin"],
            Self::Electric => &[
                "tesla", "rivian", "lucid", "polestar", "electric", "e-tron", "ioniq", "nissan leaf",
                "bolt ev", "bolt euv", "taycan", "mach-e", "id.4", "eqs", "eqe", "lightning",
                "ev6", "ev9", "rimac",
            ],
            Self::Suv => &[
                "suv", "crossover", "rav4", "cr-v", "cx-5", "explorer", "tahoe", "suburban",
                "escalade", "range rover", "cayenne", "macan", "highlander", "4runner", "wrangler",
                "bronco", "grand cherokee", "telluride", "palisade", "urus", "bentayga", "cullinan",
                "g-class", "g-wagon", "model x", "model y", "defender",
            ],
            Self::Sports => &[
                "sports car", "roadster", "911", "corvette", "supra", "miata", "mx-5", "gt86",
                "brz", "370z", "350z", "boxster", "cayman", "type r", "gt-r", "z4", "amg gt",
                "viper", "nsx",
            ],
            Self::LuxurySedan => &[
                "luxury sedan", "s-class", "e-class", "7 series", "5 series", "audi a8", "audi a6",
                "lexus ls", "genesis g90", "rolls-royce ghost", "rolls-royce phantom",
                "flying spur", "quattroporte", "panamera", "cadillac ct6", "model s",
            ],
            Self::Supercar => &["ferrari", "mclaren", "lamborghini"],
            Self::Hypercar => &["bugatti", "koenigsegg", "pagani"],
            Self::Convertible => &[
                "convertible", "cabriolet", "cabrio", "roadster", "spyder", "spider", "volante",
                "drophead",
            ],
            Self::Truck => &[
                "pickup", "truck", "f-150", "f-250", "silverado", "sierra", "ram 1500", "ram 2500",
                "tacoma", "tundra", "ranger", "colorado", "gladiator", "frontier", "titan",
                "ridgeline", "maverick", "cybertruck", "raptor", "hilux",
            ],
        }
    }

    /// `normalized_name` must already be lowercase
    pub fn matches(self, normalized_name: &str) -> bool {
        self.keywords().iter().any(|k| normalized_name.contains(k))
    }
}

static YEAR_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{4})(?:\s*[-–]\s*(\d{4}))?\b").expect("year prefix regex is valid")
});

/// Model year from a leading year or year range; the newest year of a range.
pub fn model_year(name: &str) -> Option<i32> {
    let caps = YEAR_PREFIX.captures(name)?;
    let year = caps
        .get(2)
        .or_else(|| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())?;
    (1885..=2100).contains(&year).then_some(year)
}

/// Manufacturer key: the first word after any year prefix, lowercased,
/// cut at the first hyphen ("Mercedes-Benz" and "Mercedes-AMG" both give "mercedes").
pub fn manufacturer(name: &str) -> Option<String> {
    let rest = match YEAR_PREFIX.find(name) {
        Some(m) => &name[m.end()..],
        None => name,
    };
    let word = rest.split_whitespace().next()?.to_lowercase();
    let word = word.split('-').next().unwrap_or_default();
    if word.is_empty() {
        return None;
    }
    let make = match word {
        "chevy" => "chevrolet",
        "vw" => "volkswagen",
        other => other,
    };
    Some(make.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_year() {
        assert_eq!(model_year("2019 Lamborghini Huracan EVO"), Some(2019));
        assert_eq!(model_year("2017-2022 Lamborghini Aventador S"), Some(2022));
        assert_eq!(model_year("1967 – 1969 Chevrolet Camaro"), Some(1969));
        assert_eq!(model_year("Ford Model T"), None);
        assert_eq!(model_year("20190 Nonsense"), None);
    }

    #[test]
    fn test_manufacturer() {
        assert_eq!(manufacturer("2021-2024 BMW M3 Competition").as_deref(), Some("bmw"));
        assert_eq!(manufacturer("Mercedes-Benz S-Class").as_deref(), Some("mercedes"));
        assert_eq!(manufacturer("2015 Chevy Silverado").as_deref(), Some("chevrolet"));
        assert_eq!(manufacturer("2015"), None);
    }

    #[test]
    fn test_groups() {
        let name = "2020 porsche 911 carrera cabriolet";
        assert!(CarGroup::German.matches(name));
        assert!(CarGroup::Sports.matches(name));
        assert!(CarGroup::Convertible.matches(name));
        assert!(!CarGroup::Truck.matches(name));
    }
}
