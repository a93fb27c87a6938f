//! Integration tests for manifest processing
//!
//! These tests verify the complete manifest processing workflow,
//! including mixed-content files, realistic manifests, and the
//! interaction between streaming, analysis, and version matching.

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::app::manifest::{analysis, streaming::ManifestStreamer, types::ManifestConfig, utils};
    use crate::app::models::RequirementKind;
    use crate::app::version::Version;

    async fn create_test_manifest(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    /// Test error handling across a manifest with mixed content.
    ///
    /// Purpose: Verifies that the streamer reports include directives and
    /// malformed constraints as errors while continuing to process valid
    /// entries, blank lines, and comments.
    /// Benefit: Ensures one bad line never stops manifest processing.
    #[tokio::test]
    async fn test_malformed_lines_handling() {
        let content = "\
scipy==1.6.1

-r base.txt
torch>=bad..version
easydict
";

        let manifest_file = create_test_manifest(content).await;

        let mut streamer = ManifestStreamer::new();

        let (valid_entries, errors) = {
            let mut stream = streamer.stream(manifest_file.path()).await.unwrap();
            let mut valid_entries = 0;
            let mut errors = 0;

            while let Some(result) = stream.next().await {
                match result {
                    Ok(_) => valid_entries += 1,
                    Err(_) => errors += 1,
                }
            }
            (valid_entries, errors)
        }; // stream is dropped here, ending the mutable borrow

        assert_eq!(valid_entries, 2); // scipy and easydict
        assert_eq!(errors, 2); // include directive and bad constraint

        let stats = streamer.stats();
        assert_eq!(stats.valid_entries, 2);
        assert_eq!(stats.invalid_lines, 2);
        assert_eq!(stats.blank_lines, 1);
        assert_eq!(stats.lines_processed, 5);
    }

    /// Test parsing of a realistic training-stack manifest.
    ///
    /// Purpose: Verifies correct handling of a manifest taken from a real
    /// project, including extras, trailing comments, compound ranges, and
    /// a commented-out entry.
    /// Benefit: Ensures compatibility with manifests as they appear in the
    /// wild, not just minimal examples.
    #[tokio::test]
    async fn test_real_manifest_sample() {
        let content = "\
# Requirements for model training
numpy
scipy==1.6.1
torch-pitch-shift>=1.2.2,<1.3
PyWavelets>=1.1.1  # wavelet transforms
ruamel.yaml
biosppy[signals]>=0.6.1
# Cython==0.29.10
";

        let manifest_file = create_test_manifest(content).await;

        let requirements =
            utils::collect_all_requirements(manifest_file.path(), ManifestConfig::default())
                .await
                .unwrap();

        assert_eq!(requirements.len(), 6);

        let scipy = &requirements[1];
        assert_eq!(scipy.name.as_str(), "scipy");
        assert_eq!(scipy.kind(), RequirementKind::Pinned);
        assert_eq!(scipy.pinned_version().unwrap().to_string(), "1.6.1");

        let shift = &requirements[2];
        assert_eq!(shift.name.canonical(), "torch-pitch-shift");
        assert_eq!(shift.kind(), RequirementKind::Ranged);
        assert_eq!(shift.specifiers.to_string(), ">=1.2.2,<1.3");

        let wavelets = &requirements[3];
        assert_eq!(wavelets.name.as_str(), "PyWavelets");
        assert_eq!(wavelets.comment.as_deref(), Some("wavelet transforms"));

        let biosppy = &requirements[5];
        assert_eq!(biosppy.extras, vec!["signals".to_string()]);
    }

    /// Test that commented-out entries stay inert through the pipeline.
    ///
    /// Purpose: Verifies that a disabled entry is counted in statistics but
    /// never surfaces as an active package, even when the same name is
    /// absent from the active entries.
    /// Benefit: Ensures toggling a line with `#` reliably removes it from
    /// every downstream view.
    #[tokio::test]
    async fn test_disabled_entries_stay_inert() {
        let content = "\
torch==1.10.0
# Cython==0.29.10
# plain note, not an entry
";

        let manifest_file = create_test_manifest(content).await;

        let stats = utils::validate_manifest(manifest_file.path(), 0)
            .await
            .unwrap();
        assert_eq!(stats.valid_entries, 1);
        assert_eq!(stats.comment_lines, 2);
        assert_eq!(stats.disabled_entries, 1);
        assert!(stats.is_clean());

        let packages = analysis::collect_packages(manifest_file.path())
            .await
            .unwrap();
        assert_eq!(packages.len(), 1);
        assert!(packages.contains_key("torch"));
        assert!(!packages.contains_key("cython"));
    }

    /// Test the complete check-then-query workflow on one manifest.
    ///
    /// Purpose: Verifies that validation statistics, package lookup, and
    /// constraint evaluation agree with each other for the same file.
    /// Benefit: Ensures the subsystems compose into a coherent whole.
    #[tokio::test]
    async fn test_full_workflow() {
        let content = "\
scipy==1.6.1
torch-pitch-shift>=1.2.2,<1.3
easydict
";

        let manifest_file = create_test_manifest(content).await;

        // Step 1: validate
        let stats = utils::validate_manifest(manifest_file.path(), 0)
            .await
            .unwrap();
        assert!(stats.is_clean());
        assert_eq!(stats.valid_entries, 3);

        // Step 2: look up an entry under a different spelling
        let requirement = analysis::find_requirement(manifest_file.path(), "Torch_Pitch_Shift")
            .await
            .unwrap()
            .expect("entry should exist");

        // Step 3: evaluate candidate versions against its constraint
        let inside: Version = "1.2.5".parse().unwrap();
        let outside: Version = "1.3.0".parse().unwrap();
        assert!(requirement.matches(&inside));
        assert!(!requirement.matches(&outside));
    }

    /// Test duplicate handling end to end.
    ///
    /// Purpose: Verifies that duplicates surface as findings during strict
    /// streaming while package analysis still aggregates every occurrence.
    /// Benefit: Ensures the two duplicate policies stay consistent with
    /// each other.
    #[tokio::test]
    async fn test_duplicate_policies_agree() {
        let content = "\
torch==1.9.0
scipy==1.6.1
Torch>=1.10
";

        let manifest_file = create_test_manifest(content).await;

        let stats = utils::validate_manifest(manifest_file.path(), 0)
            .await
            .unwrap();
        assert_eq!(stats.duplicate_names, 1);
        assert_eq!(stats.findings(), 1);

        let packages = analysis::collect_packages(manifest_file.path())
            .await
            .unwrap();
        let torch = packages.get("torch").unwrap();
        assert_eq!(torch.occurrences, 2);
        // First occurrence supplies the constraint
        assert_eq!(torch.specifiers, "==1.9.0");
    }
}
