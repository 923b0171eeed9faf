//! Per-call evaluation options

/// How symbolic results should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolicMode {
    #[default]
    None,
    Symbolic,
}

/// Options governing a single evaluation
///
/// Values are never mutated in place; the `with_*` methods return adjusted
/// copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalInfo {
    pub label_output: bool,
    pub allow_redefinition: bool,
    pub autocreate_sliders: bool,
    pub symbolic_mode: SymbolicMode,
}

impl Default for EvalInfo {
    fn default() -> Self {
        Self {
            label_output: true,
            allow_redefinition: false,
            autocreate_sliders: false,
            symbolic_mode: SymbolicMode::None,
        }
    }
}

impl EvalInfo {
    pub fn new(label_output: bool, allow_redefinition: bool) -> Self {
        Self {
            label_output,
            allow_redefinition,
            ..Self::default()
        }
    }

    pub fn with_labels(self, label_output: bool) -> Self {
        Self {
            label_output,
            ..self
        }
    }

    pub fn with_sliders(self, autocreate_sliders: bool) -> Self {
        Self {
            autocreate_sliders,
            ..self
        }
    }

    pub fn with_redefinition(self, allow_redefinition: bool) -> Self {
        Self {
            allow_redefinition,
            ..self
        }
    }

    pub fn with_symbolic_mode(self, symbolic_mode: SymbolicMode) -> Self {
        Self {
            symbolic_mode,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_copies_leave_original_untouched() {
        let base = EvalInfo::default();
        let derived = base.with_labels(false).with_sliders(true);

        assert!(base.label_output);
        assert!(!base.autocreate_sliders);
        assert!(!derived.label_output);
        assert!(derived.autocreate_sliders);
        assert_eq!(derived.allow_redefinition, base.allow_redefinition);
    }

    #[test]
    fn test_with_redefinition_and_symbolic_mode() {
        let info = EvalInfo::new(true, false)
            .with_redefinition(true)
            .with_symbolic_mode(SymbolicMode::Symbolic);
        assert!(info.allow_redefinition);
        assert_eq!(info.symbolic_mode, SymbolicMode::Symbolic);
    }
}
