use crate::cube_state::{CubeState, FACELET_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceMap(
    // The indices of this array are the new facelet positions.
    // The values are the old facelet positions to pull colors from.
    pub [u8; FACELET_COUNT],
);

impl FaceMap {
    pub const fn identity() -> FaceMap {
        let mut map = [0; FACELET_COUNT];
        let mut i = 0;
        while i < FACELET_COUNT {
            map[i] = i as u8;
            i += 1;
        }
        FaceMap(map)
    }

    /// Builds a map from `(destination, source)` pairs.
    /// Positions that are not a destination keep their color.
    pub const fn from_pairs<const N: usize>(pairs: [(u8, u8); N]) -> FaceMap {
        let mut face_map = FaceMap::identity();
        let mut i = 0;
        while i < N {
            let (destination, source) = pairs[i];
            face_map.0[destination as usize] = source;
            i += 1;
        }
        face_map
    }

    /// Apply another FaceMap after this one.
    /// Returns a new FaceMap that represents the combination.
    pub fn apply(&self, other: &FaceMap) -> FaceMap {
        let mut combined = [0; FACELET_COUNT];
        for (new_index, &index_from_other) in other.0.iter().enumerate() {
            combined[new_index] = self.0[index_from_other as usize];
        }
        FaceMap(combined)
    }

    pub fn invert(&self) -> FaceMap {
        let mut inverted = [0; FACELET_COUNT];
        for (new_index, &old_index) in self.0.iter().enumerate() {
            inverted[old_index as usize] = new_index as u8;
        }
        FaceMap(inverted)
    }

    pub fn is_inverse_of(&self, other: &FaceMap) -> bool {
        self.0
            .iter()
            .enumerate()
            .all(|(i, &val)| other.0[val as usize] as usize == i)
    }

    /// Every position appears exactly once as a source.
    pub fn is_bijection(&self) -> bool {
        let mut seen = [false; FACELET_COUNT];
        for &old_index in &self.0 {
            match seen.get_mut(old_index as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    pub fn num_moved(&self) -> usize {
        self.0
            .iter()
            .enumerate()
            .filter(|(i, &old_index)| *i != old_index as usize)
            .count()
    }

    pub fn permute(&self, state: &CubeState) -> CubeState {
        let old = state.facelets();
        let mut facelets = *old;
        for (new_index, &old_index) in self.0.iter().enumerate() {
            facelets[new_index] = old[old_index as usize];
        }
        CubeState(facelets)
    }
}
