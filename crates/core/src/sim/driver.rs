//! Trace driver.
//!
//! Walks every destination pixel of every image, maps it through the image's
//! kernel, applies reflect-101 to the resulting source taps, and issues the
//! loads (and optional destination stores) in a fixed order:
//!
//! - flips: one load of the mirrored pixel;
//! - rotation: four loads, top-left, top-right, bottom-left, bottom-right,
//!   where the taps are the floor/ceil of each fractional source coordinate;
//! - with stores modeled: one store of the destination pixel afterwards.
//!
//! Kernel parameters are drawn once per image from a seeded generator, so a
//! run is reproducible from its configuration alone.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cache::CacheHierarchy;
use crate::common::data::AccessEvent;
use crate::common::error::AccessError;
use crate::config::ValidatedConfig;
use crate::image::{AddressLayout, Kernel, Region, SourceCoord, Transform, reflect_101};

/// Destination pixel order for `p` rows processed together.
///
/// Rows are taken in groups of `p` consecutive rows (the last group may be
/// shorter). Within a group the column advances slowest: for each `x'`, every
/// row of the group is visited top to bottom. `p = 1` is row-major raster order.
pub fn row_parallel_order(width: u64, height: u64, p: u64) -> impl Iterator<Item = (i64, i64)> {
    let p = p.max(1);
    (0..height).step_by(p as usize).flat_map(move |y0| {
        let y1 = (y0 + p).min(height);
        (0..width).flat_map(move |x| (y0..y1).map(move |y| (x as i64, y as i64)))
    })
}

/// Generates the access trace of a validated configuration.
#[derive(Debug)]
pub struct TraceDriver<'a> {
    config: &'a ValidatedConfig,
    layout: AddressLayout,
    rng: StdRng,
}

impl<'a> TraceDriver<'a> {
    /// Creates a driver whose angle source is seeded from the configuration.
    pub fn new(config: &'a ValidatedConfig) -> Self {
        Self {
            config,
            layout: AddressLayout::new(config.image, config.n_images),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Address layout of the batch.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Drives the whole batch into `hierarchy`.
    ///
    /// # Errors
    ///
    /// Returns the first [`AccessError`]; the run is aborted and no partial
    /// result is meaningful.
    pub fn run(&mut self, hierarchy: &mut CacheHierarchy) -> Result<(), AccessError> {
        self.visit(|event| hierarchy.issue(event).map(|_| ()))
    }

    /// Feeds every access of the batch, in order, to `sink`.
    ///
    /// # Errors
    ///
    /// Stops at the first error from address translation or from `sink`.
    pub fn visit<E, F>(&mut self, mut sink: F) -> Result<(), E>
    where
        E: From<AccessError>,
        F: FnMut(AccessEvent) -> Result<(), E>,
    {
        let geometry = self.config.image;
        let size = geometry.pixel_size;

        for image in 0..self.config.n_images {
            let kernel = self
                .config
                .kernel
                .instantiate(&mut self.rng, self.config.max_rotation_degrees);
            if let Kernel::Rotate { angle_degrees } = kernel {
                tracing::debug!(image, angle_degrees, "rotate");
            } else {
                tracing::debug!(image, kernel = %self.config.kernel, "flip");
            }

            let transform = kernel.transform(&geometry);
            let read_offset = self.layout.role_offset(Region::Read, image);
            let write_offset = self.layout.role_offset(Region::Write, image);

            for (xd, yd) in
                row_parallel_order(geometry.width, geometry.height, self.config.parallelism)
            {
                for (x, y) in Self::taps(&transform, xd, yd, geometry.width, geometry.height) {
                    let addr = self.layout.address(x, y, read_offset)?;
                    sink(AccessEvent::load(addr, size))?;
                }
                if self.config.model_stores {
                    let addr = self.layout.address(xd, yd, write_offset)?;
                    sink(AccessEvent::store(addr, size))?;
                }
            }
        }
        Ok(())
    }

    /// Border-corrected source pixels read for destination `(xd, yd)`, in issue order.
    fn taps(
        transform: &Transform,
        xd: i64,
        yd: i64,
        width: u64,
        height: u64,
    ) -> impl Iterator<Item = (i64, i64)> {
        let taps: Taps = match transform.apply(xd, yd) {
            SourceCoord::Fractional(x, y) => {
                let x1 = reflect_101(x.floor() as i64, width);
                let x2 = reflect_101(x.ceil() as i64, width);
                let y1 = reflect_101(y.floor() as i64, height);
                let y2 = reflect_101(y.ceil() as i64, height);
                Taps::Four([(x1, y1), (x2, y1), (x1, y2), (x2, y2)])
            }
            SourceCoord::Exact(x, y) => Taps::One((reflect_101(x, width), reflect_101(y, height))),
        };
        taps.into_iter()
    }
}

/// One or four taps, without allocating.
enum Taps {
    One((i64, i64)),
    Four([(i64, i64); 4]),
}

impl IntoIterator for Taps {
    type Item = (i64, i64);
    type IntoIter = std::iter::Take<std::array::IntoIter<(i64, i64), 4>>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::One(tap) => [tap; 4].into_iter().take(1),
            Self::Four(taps) => taps.into_iter().take(4),
        }
    }
}
