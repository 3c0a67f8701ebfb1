use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "lb")]
    Pounds,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lb",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kilograms" => Some(WeightUnit::Kilograms),
            "lb" | "lbs" | "pounds" => Some(WeightUnit::Pounds),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeUnit {
    #[default]
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "in")]
    Inches,
}

impl SizeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeUnit::Centimeters => "cm",
            SizeUnit::Inches => "in",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cm" | "centimeters" => Some(SizeUnit::Centimeters),
            "in" | "inches" => Some(SizeUnit::Inches),
            _ => None,
        }
    }
}
