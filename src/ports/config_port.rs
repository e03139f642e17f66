//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// Names of all sections present, in no particular order.
    fn sections(&self) -> Vec<String>;
}
