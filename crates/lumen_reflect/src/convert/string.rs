use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};

use super::ConvertTarget;
use crate::Rtti;
use crate::view::ObjectView;

impl ConvertTarget for String {
    fn convert_from(view: &ObjectView<'_>) -> Option<Self> {
        if let Some(s) = view.downcast_ref::<&'static str>() {
            return Some(String::from(*s));
        }
        if let Some(s) = view.downcast_ref::<Box<str>>() {
            return Some(String::from(&**s));
        }
        if let Some(s) = view.downcast_ref::<Cow<'static, str>>() {
            return Some(s.clone().into_owned());
        }
        view.downcast_ref::<char>().map(ToString::to_string)
    }

    fn is_convertible_from(rtti: &Rtti) -> bool {
        rtti.is::<&'static str>()
            || rtti.is::<Box<str>>()
            || rtti.is::<Cow<'static, str>>()
            || rtti.is::<char>()
    }
}

impl ConvertTarget for Cow<'static, str> {
    fn convert_from(view: &ObjectView<'_>) -> Option<Self> {
        if let Some(s) = view.downcast_ref::<&'static str>() {
            return Some(Cow::Borrowed(*s));
        }
        view.downcast_ref::<String>().cloned().map(Cow::Owned)
    }

    fn is_convertible_from(rtti: &Rtti) -> bool {
        rtti.is::<&'static str>() || rtti.is::<String>()
    }
}

impl ConvertTarget for Box<str> {
    fn convert_from(view: &ObjectView<'_>) -> Option<Self> {
        if let Some(s) = view.downcast_ref::<&'static str>() {
            return Some(Box::from(*s));
        }
        view.downcast_ref::<String>().map(|s| s.as_str().into())
    }

    fn is_convertible_from(rtti: &Rtti) -> bool {
        rtti.is::<&'static str>() || rtti.is::<String>()
    }
}
