//! Body catalogue for ephem-core

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Bodies with heliocentric elements in the table.
///
/// `Earth` stands for the Earth-Moon barycenter, which is what the
/// approximate element set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    /// The eight planets, innermost first.
    pub const PLANETS: [Body; 8] = [
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Earth => "earth",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mercury" => Ok(Body::Mercury),
            "venus" => Ok(Body::Venus),
            "earth" | "earth-moon-barycenter" | "emb" => Ok(Body::Earth),
            "mars" => Ok(Body::Mars),
            "jupiter" => Ok(Body::Jupiter),
            "saturn" => Ok(Body::Saturn),
            "uranus" => Ok(Body::Uranus),
            "neptune" => Ok(Body::Neptune),
            "pluto" => Ok(Body::Pluto),
            _ => Err(Error::UnknownBody(s.to_string())),
        }
    }
}
