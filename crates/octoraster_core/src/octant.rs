use glam::Vec3;

/// Identifies one of the 8 child octants of a cube as a number in `[0..7]` of the binary format `0bZYX`, i.e.
/// `ix | iy << 1 | iz << 2`, where a set bit selects the upper half of that axis.
///
/// The same pattern addresses the 8 corners of a cube, so the corner and the child octant touching it share an index.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OctantIndex(u8);

/// For each octant index, the direction from a cube's center to its corner: `-1` on axes whose bit is clear, `+1` on
/// axes whose bit is set.
pub const OCTANT_SIGNS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

impl OctantIndex {
    pub const ALL: [Self; 8] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
    ];

    /// Returns `None` unless `index < 8`.
    #[inline]
    pub const fn new(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_bits(ix: bool, iy: bool, iz: bool) -> Self {
        Self(ix as u8 | (iy as u8) << 1 | (iz as u8) << 2)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn x_bit(self) -> u32 {
        (self.0 & 1) as u32
    }

    #[inline]
    pub const fn y_bit(self) -> u32 {
        ((self.0 >> 1) & 1) as u32
    }

    #[inline]
    pub const fn z_bit(self) -> u32 {
        ((self.0 >> 2) & 1) as u32
    }

    #[inline]
    pub fn sign(self) -> Vec3 {
        OCTANT_SIGNS[self.as_usize()]
    }

    /// The same octant after exchanging the Y and Z axes, e.g. when converting from a Z-up to a Y-up coordinate system.
    #[inline]
    pub const fn swap_yz(self) -> Self {
        Self((self.0 & 1) | ((self.0 >> 1) & 1) << 2 | ((self.0 >> 2) & 1) << 1)
    }

    /// Iterates over the octants whose bits are set in `mask`, in ascending order.
    #[inline]
    pub fn iter_mask(mask: u8) -> impl Iterator<Item = Self> {
        Self::ALL
            .into_iter()
            .filter(move |o| mask & (1 << o.0) != 0)
    }
}

impl From<OctantIndex> for usize {
    #[inline]
    fn from(o: OctantIndex) -> Self {
        o.as_usize()
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_match_bit_pattern() {
        for o in OctantIndex::ALL {
            let s = o.sign();
            assert_eq!(s.x > 0.0, o.x_bit() == 1);
            assert_eq!(s.y > 0.0, o.y_bit() == 1);
            assert_eq!(s.z > 0.0, o.z_bit() == 1);
            assert_eq!(
                OctantIndex::from_bits(o.x_bit() == 1, o.y_bit() == 1, o.z_bit() == 1),
                o
            );
        }
    }

    #[test]
    fn swap_yz_exchanges_axes() {
        assert_eq!(OctantIndex::from_bits(true, true, false).swap_yz(), OctantIndex::from_bits(true, false, true));
        assert_eq!(OctantIndex::from_bits(false, false, true).swap_yz(), OctantIndex::from_bits(false, true, false));
        for o in OctantIndex::ALL {
            assert_eq!(o.swap_yz().swap_yz(), o);
            assert_eq!(o.swap_yz().x_bit(), o.x_bit());
        }
    }

    #[test]
    fn mask_iteration_is_ascending() {
        let found: Vec<u8> = OctantIndex::iter_mask(0b1010_0101).map(|o| o.get()).collect();
        assert_eq!(found, vec![0, 2, 5, 7]);
        assert_eq!(OctantIndex::iter_mask(0).count(), 0);
        assert_eq!(OctantIndex::new(8), None);
    }
}
