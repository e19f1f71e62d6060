use std::time::Duration;

pub const DOOR_DWELL_ENV: &str = "ELEVATOR_DOOR_DWELL";
pub const TICK_MS_ENV: &str = "ELEVATOR_TICK_MS";

const DEFAULT_DOOR_DWELL_TICKS: u32 = 3;
const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Timing knobs shared by every elevator in the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    /// Ticks the doors stay open at a stop before the car may move on.
    pub door_dwell_ticks: u32,
    /// Length of one simulated second.
    pub tick: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            door_dwell_ticks: DEFAULT_DOOR_DWELL_TICKS,
            tick: DEFAULT_TICK,
        }
    }
}

impl SystemConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Missing or unparsable values keep their defaults. Zero is raised
    /// to one.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = SystemConfig::default();
        if let Some(ticks) = read_var::<u32>(&lookup, DOOR_DWELL_ENV) {
            config.door_dwell_ticks = ticks.max(1);
        }
        if let Some(ms) = read_var::<u64>(&lookup, TICK_MS_ENV) {
            config.tick = Duration::from_millis(ms.max(1));
        }
        config
    }
}

fn read_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring malformed {name}={raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_three_one_second_ticks() {
        let config = SystemConfig::default();
        assert_eq!(config.door_dwell_ticks, 3);
        assert_eq!(config.tick, Duration::from_secs(1));
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn missing_vars_keep_defaults() {
        assert_eq!(SystemConfig::from_lookup(lookup(&[])), SystemConfig::default());
    }

    #[test]
    fn malformed_vars_keep_defaults() {
        let vars = [(DOOR_DWELL_ENV, "three"), (TICK_MS_ENV, "-5")];
        assert_eq!(
            SystemConfig::from_lookup(lookup(&vars)),
            SystemConfig::default()
        );
    }

    #[test]
    fn zero_is_raised_to_one() {
        let vars = [(DOOR_DWELL_ENV, "0"), (TICK_MS_ENV, "0")];
        let config = SystemConfig::from_lookup(lookup(&vars));
        assert_eq!(config.door_dwell_ticks, 1);
        assert_eq!(config.tick, Duration::from_millis(1));
    }

    #[test]
    fn valid_overrides_apply() {
        let vars = [(DOOR_DWELL_ENV, " 5 "), (TICK_MS_ENV, "250")];
        let config = SystemConfig::from_lookup(lookup(&vars));
        assert_eq!(config.door_dwell_ticks, 5);
        assert_eq!(config.tick, Duration::from_millis(250));
    }
}
