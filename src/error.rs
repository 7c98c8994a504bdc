//! Error type surfaced by the conversion pipeline.
//!
//! Only dialect detection can fail. Every grammar irregularity after that is
//! absorbed by the component that meets it.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error(
        "unrecognized diagram type {header:?}: expected a `flowchart`/`graph`, `sequenceDiagram` or `erDiagram` header"
    )]
    UnrecognizedDialect { header: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_header() {
        let err = ConvertError::UnrecognizedDialect {
            header: "pie title Pets".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pie title Pets"));
        assert!(msg.contains("sequenceDiagram"));
    }
}
