//! Seed management for world generation
//!
//! Provides separate seeds for each generator, allowing fine-grained control
//! over which layers of a world to vary or keep constant.

/// Seeds for all seeded generators.
///
/// Each generator gets its own seed, derived from a master seed by default.
/// Individual seeds can be overridden for experimentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Plate positions, velocities and continental bias
    pub plates: u64,
    /// Continent blob placement and coastline warp
    pub continent: u64,
    /// Fractal terrain noise band
    pub terrain_noise: u64,
    /// Crater placement and shape
    pub craters: u64,
    /// Volcano placement, type and shape
    pub volcanoes: u64,
    /// Temperature noise
    pub temperature: u64,
    /// Air pressure noise
    pub pressure: u64,
    /// Synoptic wind noise
    pub wind: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            plates: derive_seed(master, "plates"),
            continent: derive_seed(master, "continent"),
            terrain_noise: derive_seed(master, "terrain_noise"),
            craters: derive_seed(master, "craters"),
            volcanoes: derive_seed(master, "volcanoes"),
            temperature: derive_seed(master, "temperature"),
            pressure: derive_seed(master, "pressure"),
            wind: derive_seed(master, "wind"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder::new(master)
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: WorldSeeds::from_master(master),
        }
    }

    pub fn plates(mut self, seed: u64) -> Self {
        self.seeds.plates = seed;
        self
    }

    pub fn continent(mut self, seed: u64) -> Self {
        self.seeds.continent = seed;
        self
    }

    pub fn terrain_noise(mut self, seed: u64) -> Self {
        self.seeds.terrain_noise = seed;
        self
    }

    pub fn craters(mut self, seed: u64) -> Self {
        self.seeds.craters = seed;
        self
    }

    pub fn volcanoes(mut self, seed: u64) -> Self {
        self.seeds.volcanoes = seed;
        self
    }

    pub fn temperature(mut self, seed: u64) -> Self {
        self.seeds.temperature = seed;
        self
    }

    pub fn pressure(mut self, seed: u64) -> Self {
        self.seeds.pressure = seed;
        self
    }

    pub fn wind(mut self, seed: u64) -> Self {
        self.seeds.wind = seed;
        self
    }

    /// Build the final WorldSeeds
    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a system name.
///
/// Uses FNV-1a over the name and a splitmix64 finalizer, both fixed
/// algorithms, so sub-seeds never change between toolchains or platforms.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut name_hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in system.bytes() {
        name_hash ^= byte as u64;
        name_hash = name_hash.wrapping_mul(0x0100_0000_01b3);
    }
    splitmix64(master ^ name_hash)
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Display format for seeds (useful for sharing world configurations)
impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, plates: {}, continent: {}, terrain_noise: {}, \
             craters: {}, volcanoes: {}, temperature: {}, pressure: {}, wind: {} }}",
            self.master,
            self.plates,
            self.continent,
            self.terrain_noise,
            self.craters,
            self.volcanoes,
            self.temperature,
            self.pressure,
            self.wind,
        )
    }
}
