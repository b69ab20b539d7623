// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Small bit-set types used to configure parsing and serialization.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

macro_rules! option_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $repr:ty {
            $(
                $(#[$flag_meta:meta])*
                const $flag:ident = $bit:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name($repr);

        impl $name {
            $(
                $(#[$flag_meta])*
                pub const $flag: $name = $name(1 << $bit);
            )*

            /// The set with no flag enabled.
            pub const fn empty() -> $name {
                $name(0)
            }

            /// The set with every flag enabled.
            pub const fn all() -> $name {
                $name(0 $(| (1 << $bit))*)
            }

            /// The raw bits of this set.
            pub const fn bits(self) -> $repr {
                self.0
            }

            /// Returns whether no flag is enabled.
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Returns whether every flag of `other` is enabled in `self`.
            pub const fn contains(self, other: $name) -> bool {
                self.0 & other.0 == other.0
            }

            /// Returns the union of both sets.
            pub const fn union(self, other: $name) -> $name {
                $name(self.0 | other.0)
            }

            /// Enables every flag of `other`.
            pub fn insert(&mut self, other: $name) {
                self.0 |= other.0;
            }

            /// Disables every flag of `other`.
            pub fn remove(&mut self, other: $name) {
                self.0 &= !other.0;
            }
        }

        impl BitOr for $name {
            type Output = $name;

            fn bitor(self, other: $name) -> $name {
                self.union(other)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, other: $name) {
                self.insert(other);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut set = f.debug_set();
                $(
                    if self.contains($name::$flag) {
                        set.entry(&format_args!(stringify!($flag)));
                    }
                )*
                set.finish()
            }
        }
    };
}

option_set! {
    /// Which reserved characters get replaced by entity references when serializing.
    ///
    /// The quote character used around attribute values is always escaped inside those
    /// values, whatever this set contains.
    ///
    /// ```rust
    /// use xmlnode::Entity;
    ///
    /// let set = Entity::LT | Entity::AMP;
    /// assert!(set.contains(Entity::LT));
    /// assert!(!set.contains(Entity::GT));
    /// assert!(Entity::default_set().contains(set));
    /// ```
    pub struct Entity: u8 {
        /// `<` becomes `&lt;`
        const LT = 0;
        /// `&` becomes `&amp;`
        const AMP = 1;
        /// `>` becomes `&gt;`
        const GT = 2;
        /// `"` becomes `&quot;`
        const QUOT = 3;
        /// `'` becomes `&apos;`
        const APOS = 4;
    }
}

impl Entity {
    /// The default escape set: `<`, `&` and `>`.
    pub const fn default_set() -> Entity {
        Entity::LT.union(Entity::AMP).union(Entity::GT)
    }
}

option_set! {
    /// Options handed to the lexical source when parsing.
    pub struct ParseOptions: u8 {
        /// Let the entity resolver provide the replacement text of external entities.
        const RESOLVE_EXTERNAL_ENTITIES = 0;
        /// Report namespace prefix mappings to the tree builder. Only effective together with
        /// `PROCESS_NAMESPACES`.
        const REPORT_NAMESPACE_PREFIXES = 1;
        /// Resolve element namespaces and consume `xmlns` declarations.
        const PROCESS_NAMESPACES = 2;
    }
}
