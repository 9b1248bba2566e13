// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Destination sets for one packing call.

use crate::protocol::locator::Locator;

/// Where every assembled message goes.
///
/// Lists are sent in order, unicast first; duplicates are not removed.
#[derive(Debug, Clone, Copy)]
pub enum Destinations<'a> {
    Lists {
        unicast: &'a [Locator],
        multicast: &'a [Locator],
    },
    Single(&'a Locator),
}

impl<'a> Destinations<'a> {
    #[must_use]
    pub fn lists(unicast: &'a [Locator], multicast: &'a [Locator]) -> Self {
        Destinations::Lists { unicast, multicast }
    }

    #[must_use]
    pub fn single(locator: &'a Locator) -> Self {
        Destinations::Single(locator)
    }

    /// Locators in transmission order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Locator> + 'a {
        let (unicast, multicast): (&'a [Locator], &'a [Locator]) = match *self {
            Destinations::Lists { unicast, multicast } => (unicast, multicast),
            Destinations::Single(locator) => (std::slice::from_ref(locator), &[]),
        };
        unicast.iter().chain(multicast.iter())
    }

    pub fn len(&self) -> usize {
        match self {
            Destinations::Lists { unicast, multicast } => unicast.len() + multicast.len(),
            Destinations::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
