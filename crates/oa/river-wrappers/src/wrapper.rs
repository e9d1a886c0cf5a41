//! Root marker for all River-backed wrappers.

use serde::{Deserialize, Serialize};

/// Package metadata shared by every River wrapper.
pub struct WrapperRiver;

impl WrapperRiver {
    pub const TYPE: &'static str = "Wrapper River";
    pub const WRAPPED_PACKAGE: &'static str = "river";
    pub const MINIMUM_VERSION: &'static str = "0.21.0";

    pub const SCIREF_TYPE: &'static str = "Online";
    pub const SCIREF_AUTHOR: &'static str = "River";
    pub const SCIREF_URL: &'static str = "riverml.xyz";

    pub fn sciref() -> SciRef {
        SciRef {
            kind: Self::SCIREF_TYPE.into(),
            author: Self::SCIREF_AUTHOR.into(),
            url: Self::SCIREF_URL.into(),
        }
    }
}

/// Scientific reference of a wrapped package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SciRef {
    pub kind: String,
    pub author: String,
    pub url: String,
}

/// Describes a wrapper instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperInfo {
    pub wrapper_type: String,
    pub task_name: String,
    pub wrapped_package: String,
    pub minimum_version: String,
    pub sciref: SciRef,
}

/// Implemented by every River-backed wrapper.
pub trait Wrapper {
    /// Human readable type label of the concrete wrapper.
    fn wrapper_type(&self) -> &'static str;

    /// Name of the stream task the wrapper runs as.
    fn task_name(&self) -> &str;

    fn wrapped_package(&self) -> &'static str {
        WrapperRiver::WRAPPED_PACKAGE
    }

    fn minimum_version(&self) -> &'static str {
        WrapperRiver::MINIMUM_VERSION
    }

    fn info(&self) -> WrapperInfo {
        WrapperInfo {
            wrapper_type: self.wrapper_type().into(),
            task_name: self.task_name().into(),
            wrapped_package: self.wrapped_package().into(),
            minimum_version: self.minimum_version().into(),
            sciref: WrapperRiver::sciref(),
        }
    }
}

/// Short type name of `T` without its module path or generic arguments.
pub(crate) fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl Wrapper for Dummy {
        fn wrapper_type(&self) -> &'static str {
            "Dummy (river)"
        }

        fn task_name(&self) -> &str {
            "dummy"
        }
    }

    #[test]
    fn info_carries_package_metadata() {
        let info = Dummy.info();
        assert_eq!(info.wrapped_package, "river");
        assert_eq!(info.minimum_version, "0.21.0");
        assert_eq!(info.sciref.url, "riverml.xyz");
        assert_eq!(info.wrapper_type, "Dummy (river)");
    }

    #[test]
    fn short_type_name_strips_paths_and_generics() {
        assert_eq!(short_type_name::<Dummy>(), "Dummy");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
    }
}
