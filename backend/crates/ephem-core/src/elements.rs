//! Keplerian element table and orbit propagation.
//!
//! Elements and rates are the JPL "Approximate Positions of the Planets"
//! set fitted for 1800 AD – 2050 AD, referred to the mean ecliptic and
//! equinox of J2000. Accuracy inside the fitted span is a few arcminutes for
//! the inner planets, degrading slowly outside it.

use crate::error::{Error, Result};
use crate::types::Body;

/// One orbital element at J2000 plus its rate per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub at_epoch: f64,
    pub per_century: f64,
}

impl Element {
    const fn new(at_epoch: f64, per_century: f64) -> Self {
        Self {
            at_epoch,
            per_century,
        }
    }

    fn at(&self, centuries: f64) -> f64 {
        self.at_epoch + self.per_century * centuries
    }
}

/// Mean orbital elements of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerElements {
    /// Semi-major axis (AU)
    pub semi_major_axis: Element,
    /// Eccentricity
    pub eccentricity: Element,
    /// Inclination (deg)
    pub inclination: Element,
    /// Mean longitude (deg)
    pub mean_longitude: Element,
    /// Longitude of perihelion (deg)
    pub perihelion_longitude: Element,
    /// Longitude of the ascending node (deg)
    pub node_longitude: Element,
}

/// Elements evaluated at a single epoch. Angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub argument_of_perihelion: f64,
    pub node_longitude: f64,
    pub mean_anomaly: f64,
}

impl KeplerElements {
    /// Table entry for `body`.
    pub const fn for_body(body: Body) -> Self {
        match body {
            Body::Mercury => Self {
                semi_major_axis: Element::new(0.387_099_27, 0.000_000_37),
                eccentricity: Element::new(0.205_635_93, 0.000_019_06),
                inclination: Element::new(7.004_979_02, -0.005_947_49),
                mean_longitude: Element::new(252.250_323_50, 149_472.674_111_75),
                perihelion_longitude: Element::new(77.457_796_28, 0.160_476_89),
                node_longitude: Element::new(48.330_765_93, -0.125_340_81),
            },
            Body::Venus => Self {
                semi_major_axis: Element::new(0.723_335_66, 0.000_003_90),
                eccentricity: Element::new(0.006_776_72, -0.000_041_07),
                inclination: Element::new(3.394_676_05, -0.000_788_90),
                mean_longitude: Element::new(181.979_099_50, 58_517.815_387_29),
                perihelion_longitude: Element::new(131.602_467_18, 0.002_683_29),
                node_longitude: Element::new(76.679_842_55, -0.277_694_18),
            },
            Body::Earth => Self {
                semi_major_axis: Element::new(1.000_002_61, 0.000_005_62),
                eccentricity: Element::new(0.016_711_23, -0.000_043_92),
                inclination: Element::new(-0.000_015_31, -0.012_946_68),
                mean_longitude: Element::new(100.464_571_66, 35_999.372_449_81),
                perihelion_longitude: Element::new(102.937_681_93, 0.323_273_64),
                node_longitude: Element::new(0.0, 0.0),
            },
            Body::Mars => Self {
                semi_major_axis: Element::new(1.523_710_34, 0.000_018_47),
                eccentricity: Element::new(0.093_394_10, 0.000_078_82),
                inclination: Element::new(1.849_691_42, -0.008_131_31),
                mean_longitude: Element::new(-4.553_432_05, 19_140.302_684_99),
                perihelion_longitude: Element::new(-23.943_629_59, 0.444_410_88),
                node_longitude: Element::new(49.559_538_91, -0.292_573_43),
            },
            Body::Jupiter => Self {
                semi_major_axis: Element::new(5.202_887_00, -0.000_116_07),
                eccentricity: Element::new(0.048_386_24, -0.000_132_53),
                inclination: Element::new(1.304_396_95, -0.001_837_14),
                mean_longitude: Element::new(34.396_440_51, 3_034.746_127_75),
                perihelion_longitude: Element::new(14.728_479_83, 0.212_526_68),
                node_longitude: Element::new(100.473_909_09, 0.204_691_06),
            },
            Body::Saturn => Self {
                semi_major_axis: Element::new(9.536_675_94, -0.001_250_60),
                eccentricity: Element::new(0.053_861_79, -0.000_509_91),
                inclination: Element::new(2.485_991_87, 0.001_936_09),
                mean_longitude: Element::new(49.954_244_23, 1_222.493_622_01),
                perihelion_longitude: Element::new(92.598_878_31, -0.418_972_16),
                node_longitude: Element::new(113.662_424_48, -0.288_677_94),
            },
            Body::Uranus => Self {
                semi_major_axis: Element::new(19.189_164_64, -0.001_961_76),
                eccentricity: Element::new(0.047_257_44, -0.000_043_97),
                inclination: Element::new(0.772_637_83, -0.002_429_39),
                mean_longitude: Element::new(313.238_104_51, 428.482_027_85),
                perihelion_longitude: Element::new(170.954_276_30, 0.408_052_81),
                node_longitude: Element::new(74.016_925_03, 0.042_405_89),
            },
            Body::Neptune => Self {
                semi_major_axis: Element::new(30.069_922_76, 0.000_262_91),
                eccentricity: Element::new(0.008_590_48, 0.000_051_05),
                inclination: Element::new(1.770_043_47, 0.000_353_72),
                mean_longitude: Element::new(-55.120_029_69, 218.459_453_25),
                perihelion_longitude: Element::new(44.964_762_27, -0.322_414_64),
                node_longitude: Element::new(131.784_225_74, -0.005_086_64),
            },
            Body::Pluto => Self {
                semi_major_axis: Element::new(39.482_116_75, -0.000_315_96),
                eccentricity: Element::new(0.248_827_30, 0.000_051_70),
                inclination: Element::new(17.140_012_06, 0.000_048_18),
                mean_longitude: Element::new(238.929_038_33, 145.207_805_15),
                perihelion_longitude: Element::new(224.068_916_29, -0.040_629_42),
                node_longitude: Element::new(110.303_936_84, -0.011_834_82),
            },
        }
    }

    /// Evaluate the elements `centuries` Julian centuries after J2000.
    pub fn at(&self, centuries: f64) -> OrbitState {
        let perihelion = self.perihelion_longitude.at(centuries);
        let node = self.node_longitude.at(centuries);
        let mean_anomaly = wrap_signed_deg(self.mean_longitude.at(centuries) - perihelion);

        OrbitState {
            semi_major_axis: self.semi_major_axis.at(centuries),
            eccentricity: self.eccentricity.at(centuries),
            inclination: self.inclination.at(centuries).to_radians(),
            argument_of_perihelion: (perihelion - node).to_radians(),
            node_longitude: node.to_radians(),
            mean_anomaly: mean_anomaly.to_radians(),
        }
    }
}

impl OrbitState {
    /// Solve M = E - e·sin(E) for the eccentric anomaly with Newton's method.
    pub fn eccentric_anomaly(&self) -> Result<f64> {
        let e = self.eccentricity;
        let m = self.mean_anomaly;
        let mut anomaly = m + e * m.sin();

        for _ in 0..50 {
            let delta = (anomaly - e * anomaly.sin() - m) / (1.0 - e * anomaly.cos());
            anomaly -= delta;
            if delta.abs() < 1e-12 {
                return Ok(anomaly);
            }
        }

        Err(Error::NoConvergence {
            mean_anomaly_deg: m.to_degrees(),
        })
    }

    /// Heliocentric position in the J2000 ecliptic frame (AU).
    pub fn position(&self) -> Result<[f64; 3]> {
        let anomaly = self.eccentric_anomaly()?;
        let e = self.eccentricity;
        let a = self.semi_major_axis;

        // Coordinates in the orbital plane, x towards perihelion.
        let xp = a * (anomaly.cos() - e);
        let yp = a * (1.0 - e * e).sqrt() * anomaly.sin();

        let (sin_w, cos_w) = self.argument_of_perihelion.sin_cos();
        let (sin_n, cos_n) = self.node_longitude.sin_cos();
        let (sin_i, cos_i) = self.inclination.sin_cos();

        let x = (cos_w * cos_n - sin_w * sin_n * cos_i) * xp
            + (-sin_w * cos_n - cos_w * sin_n * cos_i) * yp;
        let y = (cos_w * sin_n + sin_w * cos_n * cos_i) * xp
            + (-sin_w * sin_n + cos_w * cos_n * cos_i) * yp;
        let z = (sin_w * sin_i) * xp + (cos_w * sin_i) * yp;

        Ok([x, y, z])
    }
}

/// Wrap degrees into (-180, 180].
fn wrap_signed_deg(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}
