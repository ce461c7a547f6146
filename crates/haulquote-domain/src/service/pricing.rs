//! Price bands and load sizes for a reconciled volume
//!
//! Price and load size use separate breakpoints (price: 2/3/4/8 yd³,
//! load size: 2/4/8/12 yd³). A 2.5 yd³ job is quoted "$169 - $199" and
//! labelled "1/4 Truck". Keep the two tables independent.

/// Upper bound (inclusive, cubic yards) and the price range quoted up to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub upper_bound: f64,
    pub price_range: &'static str,
}

/// Ascending; first band whose bound is >= the volume wins.
pub const PRICE_BANDS: [PriceBand; 4] = [
    PriceBand {
        upper_bound: 2.0,
        price_range: "$129 - $159",
    },
    PriceBand {
        upper_bound: 3.0,
        price_range: "$169 - $199",
    },
    PriceBand {
        upper_bound: 4.0,
        price_range: "$229 - $269",
    },
    PriceBand {
        upper_bound: 8.0,
        price_range: "$349 - $449",
    },
];

/// Quoted above the last band
pub const OPEN_PRICE_RANGE: &str = "$599+";

/// Price range string for a volume in cubic yards.
pub fn price_range(volume: f64) -> &'static str {
    PRICE_BANDS
        .iter()
        .find(|band| volume <= band.upper_bound)
        .map(|band| band.price_range)
        .unwrap_or(OPEN_PRICE_RANGE)
}

/// How much of the truck a job takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSize {
    /// Up to 2 yd³
    MinLoad,
    /// Up to 4 yd³
    QuarterTruck,
    /// Up to 8 yd³
    HalfTruck,
    /// Under 12 yd³
    ThreeQuarterTruck,
    /// 12 yd³ and above
    FullTruck,
}

impl LoadSize {
    pub fn from_volume(volume: f64) -> Self {
        match volume {
            v if v <= 2.0 => LoadSize::MinLoad,
            v if v <= 4.0 => LoadSize::QuarterTruck,
            v if v <= 8.0 => LoadSize::HalfTruck,
            v if v < 12.0 => LoadSize::ThreeQuarterTruck,
            _ => LoadSize::FullTruck,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadSize::MinLoad => "Min Load",
            LoadSize::QuarterTruck => "1/4 Truck",
            LoadSize::HalfTruck => "1/2 Truck",
            LoadSize::ThreeQuarterTruck => "3/4 Truck",
            LoadSize::FullTruck => "Full Truck",
        }
    }
}

impl std::fmt::Display for LoadSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Price and load size for one volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub volume: f64,
    pub price_range: &'static str,
    pub load_size: LoadSize,
}

pub fn derive_quote(volume: f64) -> Quote {
    Quote {
        volume,
        price_range: price_range(volume),
        load_size: LoadSize::from_volume(volume),
    }
}
