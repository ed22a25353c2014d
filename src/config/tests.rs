// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
use super::*;

#[test]
fn defaults() {
    let params = Parameters::default();
    assert_eq!(params.malformed_token, Policy::Abort);
    assert_eq!(params.orphan_completion, Policy::Report);
}

#[test]
fn policy_is_abort() {
    assert!(Policy::Abort.is_abort());
    assert!(!Policy::Report.is_abort());
}

#[cfg(feature = "serde")]
mod toml_params {
    use super::*;

    #[test]
    fn empty() {
        let params: Parameters = toml::from_str("").expect("Could not parse parameters");
        assert_eq!(params, PARAMETERS);
    }

    #[test]
    fn partial() {
        let params: Parameters =
            toml::from_str("orphan_completion = \"abort\"").expect("Could not parse parameters");
        assert_eq!(
            params,
            Parameters {
                orphan_completion: Policy::Abort,
                ..Default::default()
            }
        );
    }

    #[test]
    fn full() {
        let params: Parameters =
            toml::from_str("malformed_token = \"report\"\norphan_completion = \"abort\"\n")
                .expect("Could not parse parameters");
        assert_eq!(params.malformed_token, Policy::Report);
        assert_eq!(params.orphan_completion, Policy::Abort);
    }

    #[test]
    fn unknown_key() {
        assert!(toml::from_str::<Parameters>("cache_size_p = 10").is_err());
    }

    #[test]
    fn unknown_policy() {
        assert!(toml::from_str::<Parameters>("malformed_token = \"ignore\"").is_err());
    }
}
