/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use super::ROOT_ID;

const MEMORY_EXPAND_RATIO: usize = 2;

/// Mutable BASE/CHECK arrays used while a trie is being built.
///
/// Unused slots are chained into a doubly linked free list:
/// `BASE[n] = -prev` and `CHECK[n] = -next`.
/// Slots past the end of the arrays behave as if they were already
/// initialized free slots, so the list continues virtually to infinity.
pub(super) struct BaseCheck {
    base: Vec<i32>,
    check: Vec<i32>,
    first_unused_node: usize,
}

#[inline]
fn free_prev(index: usize) -> i32 {
    1 - index as i32
}

#[inline]
fn free_next(index: usize) -> i32 {
    -(index as i32) - 1
}

impl BaseCheck {
    pub fn new(initial_size: usize) -> BaseCheck {
        let size = std::cmp::max(initial_size, ROOT_ID + 2);
        let mut base: Vec<i32> = (0..size).map(free_prev).collect();
        let mut check: Vec<i32> = (0..size).map(free_next).collect();
        base[ROOT_ID] = 1;
        check[ROOT_ID] = ROOT_ID as i32;
        BaseCheck {
            base,
            check,
            first_unused_node: ROOT_ID + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn base(&self, index: usize) -> i32 {
        match self.base.get(index) {
            Some(v) => *v,
            None => self.virtual_prev(index),
        }
    }

    pub fn check(&self, index: usize) -> i32 {
        match self.check.get(index) {
            Some(v) => *v,
            None => free_next(index),
        }
    }

    pub fn set_base(&mut self, index: usize, value: i32) {
        if index >= self.base.len() {
            self.realloc(index);
        }
        self.base[index] = value;
    }

    pub fn set_check(&mut self, index: usize, value: i32) {
        if index >= self.check.len() {
            self.realloc(index);
        }
        self.check[index] = value;
    }

    pub fn first_unused_node(&self) -> usize {
        self.first_unused_node
    }

    pub fn set_first_unused_node(&mut self, index: usize) {
        self.first_unused_node = index;
    }

    pub fn is_unused(&self, index: usize) -> bool {
        index != ROOT_ID && self.check(index) < 0
    }

    /// BASE of a slot past the end of the arrays.
    /// The first virtual slot links back to the last free slot of the real area.
    fn virtual_prev(&self, index: usize) -> i32 {
        let size = self.check.len();
        if index != size || self.check.last().map_or(true, |&c| c < 0) {
            return free_prev(index);
        }
        let last_unused = (ROOT_ID + 1..size)
            .rev()
            .find(|&i| self.check[i] < 0)
            .unwrap_or(ROOT_ID);
        -(last_unused as i32)
    }

    /// Grows both arrays to twice the requested index,
    /// initializing the new area as free slots
    fn realloc(&mut self, min_size: usize) {
        let old_size = self.base.len();
        let new_size = min_size * MEMORY_EXPAND_RATIO;
        if new_size <= old_size {
            return;
        }

        let tail_prev = self.virtual_prev(old_size);
        self.base.extend((old_size..new_size).map(free_prev));
        self.base[old_size] = tail_prev;
        self.check.extend((old_size..new_size).map(free_next));
    }

    /// Cuts the unused tail, keeping a single free slot after the last used one
    pub fn shrink(&mut self) {
        let last_used = self.check.iter().rposition(|&c| c >= 0).unwrap_or(ROOT_ID);
        let size = std::cmp::min(last_used + 2, self.check.len());
        self.base.truncate(size);
        self.check.truncate(size);
    }

    pub fn into_arrays(self) -> (Vec<i32>, Vec<i32>) {
        (self.base, self.check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_arrays_form_free_list() {
        let bc = BaseCheck::new(4);
        assert_eq!(bc.base(ROOT_ID), 1);
        assert_eq!(bc.check(ROOT_ID), 0);
        assert_eq!(bc.base(1), 0);
        assert_eq!(bc.check(1), -2);
        assert_eq!(bc.base(3), -2);
        assert_eq!(bc.check(3), -4);
        // virtual slots past the end
        assert_eq!(bc.base(10), -9);
        assert_eq!(bc.check(10), -11);
        assert!(!bc.is_unused(ROOT_ID));
        assert!(bc.is_unused(1));
        assert!(bc.is_unused(100));
    }

    #[test]
    fn realloc_doubles_requested_index() {
        let mut bc = BaseCheck::new(4);
        bc.set_check(5, 0);
        assert_eq!(bc.len(), 10);
        assert_eq!(bc.check(5), 0);
        assert_eq!(bc.base(4), -3);
        assert_eq!(bc.check(9), -10);
    }

    #[test]
    fn realloc_links_to_last_free_slot() {
        let mut bc = BaseCheck::new(4);
        bc.set_check(2, 0);
        bc.set_check(3, 0);
        bc.set_base(6, 0);
        // slot 1 is the last free slot in the old area
        assert_eq!(bc.base(4), -1);
    }

    #[test]
    fn shrink_keeps_one_free_slot() {
        let mut bc = BaseCheck::new(16);
        bc.set_check(3, 0);
        bc.shrink();
        assert_eq!(bc.len(), 5);
        let (base, check) = bc.into_arrays();
        assert_eq!(base.len(), check.len());
        assert_eq!(check[4], -5);
    }
}
