pub struct Mode {
    pub name: &'static str,
    pub tokens: &'static [&'static str],
}

pub const MODES: &[Mode] = &[
    Mode {
        name: "Interactive",
        tokens: &["--interactive"],
    },
    Mode {
        name: "Network + Interactive",
        tokens: &["--interactive", "--net"],
    },
    Mode {
        name: "Headless (net only)",
        tokens: &["--net", "--quiet"],
    },
    Mode {
        name: "Aggressive gain",
        tokens: &["--net", "--gain", "-10", "--interactive"],
    },
    Mode {
        name: "Low gain",
        tokens: &["--net", "--gain", "20", "--interactive"],
    },
    Mode {
        name: "MLAT ready",
        tokens: &["--net", "--mlat", "--interactive"],
    },
    Mode {
        name: "Net-only (no SDR)",
        tokens: &["--net", "--net-only"],
    },
];

/// Form state feeding the command builder: the binary field, the selected
/// mode and the free-text extra arguments. Flags are passed through as-is.
#[derive(Debug, Default, Clone)]
pub struct OptionModel {
    pub binary: String,
    pub mode: usize,
    pub extra_args: String,
}

impl OptionModel {
    pub fn new(binary: String) -> Self {
        OptionModel {
            binary,
            ..Default::default()
        }
    }

    pub fn selected(&self) -> &'static Mode {
        // The selector only ever offers catalog indices
        &MODES[self.mode.min(MODES.len() - 1)]
    }

    pub fn select(&mut self, index: usize) {
        if index < MODES.len() {
            self.mode = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_seven_named_modes() {
        assert_eq!(MODES.len(), 7);
        assert!(MODES.iter().all(|m| !m.name.is_empty() && !m.tokens.is_empty()));
    }

    #[test]
    fn defaults_to_first_mode() {
        let model = OptionModel::new("dump1090".to_owned());
        assert_eq!(model.selected().name, "Interactive");
        assert!(model.extra_args.is_empty());
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut model = OptionModel::default();
        model.select(2);
        assert_eq!(model.selected().name, "Headless (net only)");

        model.select(MODES.len());
        assert_eq!(model.mode, 2);
    }
}
