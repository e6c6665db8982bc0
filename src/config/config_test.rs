use serial_test::serial;
use temp_env::with_vars;

use super::*;

fn cleanup_all_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("TRUST_WATCH") {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = Settings::default();

    assert_eq!(config.routing.type_label, "type");
    assert_eq!(config.routing.remote_ca_type, "remote-ca");
    assert_eq!(config.routing.remote_api_keys_type, "remote-api-keys");
    assert!(config.routing.owner_route_enabled);
    assert_eq!(config.watch.public_certs_suffix, "-es-transport-certs-public");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn load_without_sources_should_equal_defaults() {
    cleanup_all_env_vars();
    let config = Settings::load(None).unwrap();

    assert_eq!(config.routing.relationship_name_label, "relationship-name");
    assert_eq!(config.routing.cluster_name_label, "cluster-name");
}

#[test]
#[serial]
fn load_should_merge_environment_overrides() {
    cleanup_all_env_vars();
    with_vars(
        vec![
            ("TRUST_WATCH__ROUTING__TYPE_LABEL", Some("common.k8s.elastic.co/type")),
            ("TRUST_WATCH__ROUTING__OWNER_ROUTE_ENABLED", Some("false")),
        ],
        || {
            let config = Settings::load(None).unwrap();

            assert_eq!(config.routing.type_label, "common.k8s.elastic.co/type");
            assert!(!config.routing.owner_route_enabled);
        },
    );
}

#[test]
#[serial]
fn load_should_merge_file_settings() {
    cleanup_all_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("trust_watch.toml");
    std::fs::write(
        &config_path,
        r#"
        [routing]
        remote_ca_type = "ca" # Override default value

        [watch]
        public_certs_suffix = "-public-certs"
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let config = Settings::load(config_path.to_str()).unwrap();

        assert_eq!(config.routing.remote_ca_type, "ca");
        assert_eq!(config.routing.remote_api_keys_type, "remote-api-keys");
        assert_eq!(config.watch.public_certs_suffix, "-public-certs");
    });
}

#[test]
#[serial]
fn environment_variables_should_have_highest_priority() {
    cleanup_all_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("env_config.toml");
    std::fs::write(
        &config_path,
        r#"
        [watch]
        public_certs_suffix = "-from-file"
        "#,
    )
    .unwrap();

    with_vars(
        vec![
            (CONFIG_PATH_ENV, Some(config_path.to_str().unwrap())),
            ("TRUST_WATCH__WATCH__PUBLIC_CERTS_SUFFIX", Some("-from-env")),
        ],
        || {
            let config = Settings::load(None).unwrap();
            assert_eq!(config.watch.public_certs_suffix, "-from-env");
        },
    );
}

#[test]
#[serial]
fn load_should_fail_when_explicit_file_is_missing() {
    cleanup_all_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("missing.toml");

    assert!(Settings::load(missing.to_str()).is_err());
}

#[test]
#[serial]
fn load_should_reject_invalid_merged_settings() {
    cleanup_all_env_vars();
    with_vars(
        vec![("TRUST_WATCH__ROUTING__REMOTE_API_KEYS_TYPE", Some("remote-ca"))],
        || {
            let result = Settings::load(None);
            assert!(matches!(result, Err(crate::Error::Config(_))));
        },
    );
}

#[test]
fn validation_should_reject_empty_label_key() {
    let mut config = Settings::default();
    config.routing.type_label = "".into();

    assert!(config.validate().is_err());
}

#[test]
fn validation_should_reject_identical_name_and_namespace_labels() {
    let mut config = Settings::default();
    config.routing.relationship_namespace_label = config.routing.relationship_name_label.clone();

    assert!(config.validate().is_err());
}

#[test]
fn validation_should_reject_missing_owner_kind_only_when_owner_route_enabled() {
    let mut config = Settings::default();
    config.routing.owner_kind = " ".into();
    assert!(config.validate().is_err());

    config.routing.owner_route_enabled = false;
    assert!(config.validate().is_ok());
}

#[test]
fn validation_should_reject_empty_public_certs_suffix() {
    let mut config = Settings::default();
    config.watch.public_certs_suffix = String::new();

    assert!(config.validate().is_err());
}

#[test]
fn public_certs_secret_should_live_next_to_the_cluster() {
    let config = WatchConfig::default();
    let cluster = crate::ObjectIdentity::new("ns2", "remote");

    assert_eq!(
        config.public_certs_secret(&cluster),
        crate::ObjectIdentity::new("ns2", "remote-es-transport-certs-public")
    );
}
