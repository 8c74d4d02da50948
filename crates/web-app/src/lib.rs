#![warn(clippy::pedantic)]

pub mod view;
pub mod workout_details;
pub mod workout_log;

#[allow(async_fn_in_trait)]
pub trait Repository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: Theme,
    pub weight_unit: WeightUnit,
    pub show_annotations: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            weight_unit: WeightUnit::Kg,
            show_annotations: true,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Theme {
    System,
    Light,
    Dark,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl WeightUnit {
    #[must_use]
    pub fn convert(self, kilograms: f32) -> f32 {
        match self {
            WeightUnit::Kg => kilograms,
            WeightUnit::Lb => kilograms * 2.204_62,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }
}

/// State of an asynchronously fetched page payload.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}
