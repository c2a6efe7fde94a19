use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

#[allow(dead_code)]
mod chain_demo_bin {
    include!("../chain_demo.rs");

    #[cfg(test)]
    mod coverage_tests {
        use super::*;

        #[test]
        fn test_run_without_config_prints_canonical_step() {
            let args = vec!["chain_demo".to_string()];
            let transcript = run(&args).unwrap();
            assert!(transcript.contains("Layer #0 Weights: \n0.10000\t0.80000\t\n0.40000\t0.60000\t\n\n"));
            assert!(transcript.contains("Layer #0 Error: \n-0.00241\n-0.00793\n\n"));
            assert!(transcript.contains(
                "Layer #0 Weights After Update: \n0.09916\t0.79783\t\n0.39723\t0.59287\t\n\n"
            ));
        }

        #[test]
        fn test_sections_follow_protocol_order() {
            let args = vec!["chain_demo".to_string()];
            let transcript = run(&args).unwrap();
            let position = |needle: &str| transcript.find(needle).unwrap();

            assert!(position("Input Layer") < position("Layer #0 Output"));
            assert!(position("Layer #0 Output") < position("Layer #1 Output"));
            assert!(position("Layer #1 Output") < position("Layer #1 Error"));
            assert!(position("Layer #1 Weights After Update") < position("Layer #0 Error"));
        }

        #[test]
        fn test_run_with_config_file() {
            let temp = crate::write_temp_config(
                r#"{
  "input_size": 2,
  "layers": [
    { "size": 2, "weights": [[0.1, 0.8], [0.4, 0.6]] },
    { "size": 1, "weights": [[0.3, 0.9]] }
  ],
  "seed": 3
}"#,
            );
            let args = vec![
                "chain_demo".to_string(),
                temp.path().to_str().unwrap().to_string(),
            ];
            let from_file = run(&args).unwrap();
            let canonical = run(&["chain_demo".to_string()]).unwrap();
            assert_eq!(from_file, canonical);
        }

        #[test]
        fn test_run_with_deeper_config() {
            let temp = crate::write_temp_config(
                r#"{ "input_size": 2, "layers": [{ "size": 3 }, { "size": 2 }, { "size": 1 }], "seed": 8 }"#,
            );
            let args = vec![
                "chain_demo".to_string(),
                temp.path().to_str().unwrap().to_string(),
            ];
            let transcript = run(&args).unwrap();
            assert!(transcript.contains("Layer #2 Output: \n"));
            assert!(transcript.contains("Layer #0 Weights After Update: \n"));
        }

        #[test]
        fn test_run_with_missing_config() {
            let args = vec![
                "chain_demo".to_string(),
                "config/does_not_exist.json".to_string(),
            ];
            assert!(matches!(run(&args), Err(nnet::NetworkError::Io(_))));
        }

        #[test]
        fn test_run_with_mismatched_input_size() {
            let temp = crate::write_temp_config(
                r#"{ "input_size": 3, "layers": [{ "size": 1 }], "seed": 1 }"#,
            );
            let args = vec![
                "chain_demo".to_string(),
                temp.path().to_str().unwrap().to_string(),
            ];
            let err = run(&args).unwrap_err();
            assert!(matches!(
                err,
                nnet::NetworkError::DimensionMismatch {
                    expected: 3,
                    actual: 2,
                    ..
                }
            ));
        }
    }
}
