// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Traits for converting values into attribute values and attribute sets.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// A trait for types which can be converted to an attribute value.
pub trait IntoAttributeValue {
    /// Turns this into an attribute string, or None if the attribute should be absent.
    fn into_attribute_value(self) -> Option<String>;
}

macro_rules! impl_into_attribute_values {
    ($($t:ty),*) => {
        $(
            impl IntoAttributeValue for $t {
                fn into_attribute_value(self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    }
}

impl_into_attribute_values!(
    usize, u64, u32, u16, u8, isize, i64, i32, i16, i8, f64, f32, bool, char, String
);

impl<'a> IntoAttributeValue for &'a String {
    fn into_attribute_value(self) -> Option<String> {
        Some(self.clone())
    }
}

impl<'a> IntoAttributeValue for &'a str {
    fn into_attribute_value(self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl<'a> IntoAttributeValue for Cow<'a, str> {
    fn into_attribute_value(self) -> Option<String> {
        Some(self.into_owned())
    }
}

impl<T: IntoAttributeValue> IntoAttributeValue for Option<T> {
    fn into_attribute_value(self) -> Option<String> {
        self.and_then(IntoAttributeValue::into_attribute_value)
    }
}

/// A trait for collections which can be turned into the attribute map of a node.
///
/// Pairs whose value converts to `None` are left out.
pub trait IntoAttributes {
    /// Builds the attribute map.
    fn into_attributes(self) -> BTreeMap<String, String>;
}

fn collect_attributes<K, V, I>(pairs: I) -> BTreeMap<String, String>
where
    K: Into<String>,
    V: IntoAttributeValue,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .filter_map(|(key, value)| Some((key.into(), value.into_attribute_value()?)))
        .collect()
}

impl IntoAttributes for BTreeMap<String, String> {
    fn into_attributes(self) -> BTreeMap<String, String> {
        self
    }
}

impl<K: Into<String>, V: IntoAttributeValue> IntoAttributes for HashMap<K, V> {
    fn into_attributes(self) -> BTreeMap<String, String> {
        collect_attributes(self)
    }
}

impl<K: Into<String>, V: IntoAttributeValue> IntoAttributes for Vec<(K, V)> {
    fn into_attributes(self) -> BTreeMap<String, String> {
        collect_attributes(self)
    }
}

impl<K: Into<String>, V: IntoAttributeValue, const N: usize> IntoAttributes for [(K, V); N] {
    fn into_attributes(self) -> BTreeMap<String, String> {
        collect_attributes(self)
    }
}

impl IntoAttributes for () {
    fn into_attributes(self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
