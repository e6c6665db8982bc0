use crate::ObjectIdentity;

pub fn id(
    namespace: &str,
    name: &str,
) -> ObjectIdentity {
    ObjectIdentity::new(namespace, name)
}

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = env_logger::builder().is_test(true).try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}
