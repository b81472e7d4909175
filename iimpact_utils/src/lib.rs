mod macros;

/// Version string reported by the CLI and logged on startup.
pub fn iimpact_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub trait Apply {
    /// Applies the function `f` only if `value` is `Some(...)` and provides the
    /// contained value to `f`.
    ///
    /// #### Example
    /// ```rust
    /// # use iimpact_utils::Apply;
    /// fn prefix(text: String, prefix: Option<&str>) -> String {
    ///     text.apply_map(prefix, |slf, prefix| format!("{prefix}{slf}"))
    /// }
    /// assert_eq!(prefix("world".into(), None), "world");
    /// assert_eq!(prefix("world".into(), Some("hello ")), "hello world");
    /// ```
    fn apply_map<U>(self, value: Option<U>, f: impl FnOnce(Self, U) -> Self) -> Self
    where
        Self: Sized,
    {
        if let Some(value) = value {
            f(self, value)
        } else {
            self
        }
    }
}

impl<T> Apply for T {}
