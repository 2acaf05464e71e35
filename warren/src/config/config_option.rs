use std::fmt;

/// A named, bounds-checked tunable.
///
/// Mirrors the shape of a configuration knob that has a sensible default, a
/// valid range, and a stable name for diagnostics — rather than a bare
/// struct field, so that a host assembling a [`Config`](super::Config) from
/// e.g. command-line flags gets a single place to validate and report a bad
/// value.
#[derive(Debug, Clone)]
pub struct ConfigOption<T> {
    name: &'static str,
    min: T,
    max: T,
    value: T,
}

impl<T: PartialOrd + Copy + fmt::Display> ConfigOption<T> {
    pub fn new(name: &'static str, min: T, max: T, default: T) -> Self {
        assert!(min <= max, "{name}: min must not exceed max");
        assert!(default >= min && default <= max, "{name}: default out of range");
        Self { name, min, max, value: default }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    /// Sets the value, rejecting anything outside `[min, max]`.
    pub fn set_value(&mut self, value: T) -> Result<(), ConfigOptionError> {
        if value < self.min || value > self.max {
            return Err(ConfigOptionError {
                name: self.name,
                min: self.min.to_string(),
                max: self.max.to_string(),
                attempted: value.to_string(),
            });
        }
        self.value = value;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOptionError {
    pub name: &'static str,
    pub min: String,
    pub max: String,
    pub attempted: String,
}

impl fmt::Display for ConfigOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: value {} is out of range [{}, {}]",
            self.name, self.attempted, self.min, self.max
        )
    }
}

impl std::error::Error for ConfigOptionError {}
