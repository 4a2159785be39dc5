use crate::workflow::lifecycle;

///
/// LifecycleApi
///

pub struct LifecycleApi;

impl LifecycleApi {
    pub fn init(config_str: &str) {
        lifecycle::init(config_str);
    }

    pub fn post_upgrade(config_str: &str) {
        lifecycle::post_upgrade(config_str);
    }
}
