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

use crate::error::{KuromojiError, KuromojiResult};

const HEADER_SIZE: usize = 2;

/// Connection cost matrix, `[forward (right id)][backward (left id)] -> cost`.
///
/// Stored as a flat i16 array whose first two slots hold the dimensions,
/// which is also the persisted layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCosts {
    data: Vec<i16>,
    forward_dim: usize,
    backward_dim: usize,
}

impl ConnectionCosts {
    /// Creates a zero-filled matrix
    pub fn new(forward_dim: u16, backward_dim: u16) -> ConnectionCosts {
        let (f, b) = (forward_dim as usize, backward_dim as usize);
        let mut data = vec![0; f * b + HEADER_SIZE];
        data[0] = forward_dim as i16;
        data[1] = backward_dim as i16;
        ConnectionCosts {
            data,
            forward_dim: f,
            backward_dim: b,
        }
    }

    /// Restores the matrix from its persisted form
    pub fn load(data: Vec<i16>) -> KuromojiResult<ConnectionCosts> {
        if data.len() < HEADER_SIZE {
            return Err(KuromojiError::InvalidDataFormat(
                "connection cost buffer has no dimensions".to_owned(),
            ));
        }
        if data[0] < 0 || data[1] < 0 {
            return Err(KuromojiError::InvalidDataFormat(format!(
                "negative connection cost dimensions {}x{}",
                data[0], data[1]
            )));
        }
        let forward_dim = data[0] as usize;
        let backward_dim = data[1] as usize;
        let expected = forward_dim * backward_dim + HEADER_SIZE;
        if data.len() != expected {
            return Err(KuromojiError::InvalidDataFormat(format!(
                "connection cost buffer has {} values, {}x{} matrix needs {}",
                data.len(),
                forward_dim,
                backward_dim,
                expected
            )));
        }
        Ok(ConnectionCosts {
            data,
            forward_dim,
            backward_dim,
        })
    }

    #[inline]
    fn index(&self, forward: i32, backward: i32) -> KuromojiResult<usize> {
        if forward < 0
            || backward < 0
            || forward as usize >= self.forward_dim
            || backward as usize >= self.backward_dim
        {
            return Err(KuromojiError::ConnectionOutOfRange {
                forward,
                backward,
                forward_dim: self.forward_dim,
                backward_dim: self.backward_dim,
            });
        }
        Ok(forward as usize * self.backward_dim + backward as usize + HEADER_SIZE)
    }

    /// Cost of connecting a morpheme with right id `forward`
    /// to a following one with left id `backward`
    #[inline]
    pub fn get(&self, forward: i32, backward: i32) -> KuromojiResult<i16> {
        let index = self.index(forward, backward)?;
        Ok(self.data[index])
    }

    pub fn put(&mut self, forward: i32, backward: i32, cost: i16) -> KuromojiResult<()> {
        let index = self.index(forward, backward)?;
        self.data[index] = cost;
        Ok(())
    }

    pub fn forward_dim(&self) -> usize {
        self.forward_dim
    }

    pub fn backward_dim(&self) -> usize {
        self.backward_dim
    }

    /// The whole buffer including the two dimension slots
    pub fn buffer(&self) -> &[i16] {
        &self.data
    }
}
