//! Typed error taxonomy for session construction and register access.

use thiserror::Error;

use crate::engine::{EngineSpec, MsrId, RegisterId};
use crate::variant::ArchVariant;

/// Fatal construction-time problems in a variant's register layout.
///
/// Any of these abort session creation before an engine exists; a partial,
/// half-initialized descriptor is never handed to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigurationError {
    /// Two banks composed into the same table declare the same name.
    #[error("register name `{name}` is declared by both the `{first}` and `{second}` banks")]
    DuplicateName {
        /// The colliding symbolic register name.
        name: &'static str,
        /// Bank that declared the name first, in union order.
        first: &'static str,
        /// Bank that attempted to redeclare the name.
        second: &'static str,
    },
    /// The designated program-counter name is absent from the table.
    #[error("{variant}: program-counter register `{name}` is not in the register table")]
    MissingProgramCounter {
        /// Variant whose layout was being validated.
        variant: ArchVariant,
        /// The missing designated name.
        name: &'static str,
    },
    /// The designated stack-pointer name is absent from the table.
    #[error("{variant}: stack-pointer register `{name}` is not in the register table")]
    MissingStackPointer {
        /// Variant whose layout was being validated.
        variant: ArchVariant,
        /// The missing designated name.
        name: &'static str,
    },
}

/// A native engine rejected the requested family/mode pair.
///
/// Architecture selection is a one-time decision: the descriptor propagates
/// this error without retrying, and the session is expected to be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("engine rejected {spec}: {reason}")]
pub struct EngineInitError {
    /// Family/mode pair the engine was asked to honor.
    pub spec: EngineSpec,
    /// Backend-supplied rejection detail.
    pub reason: String,
}

impl EngineInitError {
    /// Creates an initialization error for the rejected `spec`.
    #[must_use]
    pub fn new(spec: EngineSpec, reason: impl Into<String>) -> Self {
        Self {
            spec,
            reason: reason.into(),
        }
    }
}

/// Recoverable per-call lookup failure for a name, identifier or MSR
/// selector.
///
/// Surfaced to the immediate caller; session state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum UnknownRegisterError {
    /// The symbolic name is not part of the session's register table.
    #[error("unknown register name `{0}`")]
    Name(String),
    /// The native identifier is not part of the session's register table.
    #[error("unknown register id {0}")]
    Id(RegisterId),
    /// The bound context does not recognize the MSR selector.
    #[error("unknown model-specific register {0}")]
    Msr(MsrId),
}

/// Umbrella error for hosts that funnel construction and access failures
/// through one channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchError {
    /// Construction-time register layout problem.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Construction-time engine rejection.
    #[error(transparent)]
    EngineInit(#[from] EngineInitError),
    /// Per-call register lookup failure.
    #[error(transparent)]
    UnknownRegister(#[from] UnknownRegisterError),
}

#[cfg(test)]
mod tests {
    use super::{ArchError, ConfigurationError, EngineInitError, UnknownRegisterError};
    use crate::engine::{MsrId, RegisterId};
    use crate::variant::ArchVariant;

    #[test]
    fn configuration_errors_name_both_banks() {
        let error = ConfigurationError::DuplicateName {
            name: "ax",
            first: "gp16",
            second: "custom",
        };

        assert_eq!(
            error.to_string(),
            "register name `ax` is declared by both the `gp16` and `custom` banks"
        );
    }

    #[test]
    fn missing_anchor_errors_carry_the_variant() {
        let error = ConfigurationError::MissingStackPointer {
            variant: ArchVariant::X86_64,
            name: "rsp",
        };

        assert_eq!(
            error.to_string(),
            "x86_64: stack-pointer register `rsp` is not in the register table"
        );
    }

    #[test]
    fn engine_init_error_reports_the_rejected_spec() {
        let spec = ArchVariant::X86.engine_spec();
        let error = EngineInitError::new(spec, "backend unavailable");

        assert_eq!(error.spec, spec);
        assert_eq!(
            error.to_string(),
            "engine rejected x86/mode32: backend unavailable"
        );
    }

    #[test]
    fn unknown_register_errors_display_each_selector_kind() {
        assert_eq!(
            UnknownRegisterError::Name("xyz".to_owned()).to_string(),
            "unknown register name `xyz`"
        );
        assert_eq!(
            UnknownRegisterError::Id(RegisterId::new(0x0030)).to_string(),
            "unknown register id 0x0030"
        );
        assert_eq!(
            UnknownRegisterError::Msr(MsrId::new(0xC000_0080)).to_string(),
            "unknown model-specific register 0xc0000080"
        );
    }

    #[test]
    fn umbrella_error_wraps_every_class_transparently() {
        let config: ArchError = ConfigurationError::MissingProgramCounter {
            variant: ArchVariant::A8086,
            name: "ip",
        }
        .into();
        let unknown: ArchError = UnknownRegisterError::Name("nope".to_owned()).into();

        assert!(matches!(config, ArchError::Configuration(_)));
        assert!(matches!(unknown, ArchError::UnknownRegister(_)));
        assert_eq!(
            unknown.to_string(),
            UnknownRegisterError::Name("nope".to_owned()).to_string()
        );
    }
}
