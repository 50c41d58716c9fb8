// Calibration chains: raw encoder counts -> physical units

use crate::core::channels::{Channel, ChannelIndex};
use crate::core::constants::*;
use crate::core::error::{ForceFileError, Result};
use crate::core::properties::PropertyMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// One multiply-then-offset step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affine {
    pub multiplier: f64,
    pub offset: f64,
}

impl Affine {
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        value * self.multiplier + self.offset
    }
}

/// raw -> distance -> force
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeflectionFactors {
    pub raw: Affine,
    pub distance: Affine,
    pub force: Affine,
}

/// raw -> calibrated
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeightFactors {
    pub raw: Affine,
    pub calibrated: Affine,
}

// (field name, key template)
const DEFLECTION_KEYS: [(&str, &str); 6] = [
    ("raw multiplier", RAW_MULTIPLIER),
    ("raw offset", RAW_OFFSET),
    ("distance multiplier", DISTANCE_MULTIPLIER),
    ("distance offset", DISTANCE_OFFSET),
    ("force multiplier", FORCE_MULTIPLIER),
    ("force offset", FORCE_OFFSET),
];

const HEIGHT_KEYS: [(&str, &str); 4] = [
    ("raw multiplier", RAW_MULTIPLIER),
    ("raw offset", RAW_OFFSET),
    ("calibrated multiplier", NOMINAL_MULTIPLIER),
    ("calibrated offset", NOMINAL_OFFSET),
];

const UNIT_KEYS: [(Channel, &str); 2] = [
    (Channel::VDeflection, FORCE_UNIT),
    (Channel::Height, NOMINAL_UNIT),
];

impl DeflectionFactors {
    fn from_values(v: [f64; 6]) -> Self {
        Self {
            raw: Affine { multiplier: v[0], offset: v[1] },
            distance: Affine { multiplier: v[2], offset: v[3] },
            force: Affine { multiplier: v[4], offset: v[5] },
        }
    }

    fn values(&self) -> [f64; 6] {
        [
            self.raw.multiplier,
            self.raw.offset,
            self.distance.multiplier,
            self.distance.offset,
            self.force.multiplier,
            self.force.offset,
        ]
    }

    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        self.force.apply(self.distance.apply(self.raw.apply(raw)))
    }
}

impl HeightFactors {
    fn from_values(v: [f64; 4]) -> Self {
        Self {
            raw: Affine { multiplier: v[0], offset: v[1] },
            calibrated: Affine { multiplier: v[2], offset: v[3] },
        }
    }

    fn values(&self) -> [f64; 4] {
        [
            self.raw.multiplier,
            self.raw.offset,
            self.calibrated.multiplier,
            self.calibrated.offset,
        ]
    }

    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        self.calibrated.apply(self.raw.apply(raw))
    }
}

/// Conversion factors and units for the calibrated channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    pub vdeflection: DeflectionFactors,
    pub height: HeightFactors,
    pub units: BTreeMap<Channel, String>,
}

impl Calibration {
    /// Reads every coefficient and unit; any missing key aborts.
    pub fn extract(general: &PropertyMap, channels: &ChannelIndex) -> Result<Self> {
        let vdeflection_index = channels.get(Channel::VDeflection)?;
        let height_index = channels.get(Channel::Height)?;

        let vdeflection =
            DeflectionFactors::from_values(read_fields(general, vdeflection_index, &DEFLECTION_KEYS)?);
        let height = HeightFactors::from_values(read_fields(general, height_index, &HEIGHT_KEYS)?);

        let mut units = BTreeMap::new();
        for (channel, template) in UNIT_KEYS {
            let key = expand_key(template, channels.get(channel)?);
            units.insert(channel, general.require(&key)?.to_string());
        }

        Ok(Self {
            vdeflection,
            height,
            units,
        })
    }

    pub fn unit(&self, channel: Channel) -> Option<&str> {
        self.units.get(&channel).map(String::as_str)
    }

    /// Looks up a coefficient by its chain name, e.g. `"force multiplier"`.
    pub fn factor(&self, channel: Channel, name: &str) -> Option<f64> {
        match channel {
            Channel::VDeflection => lookup(&DEFLECTION_KEYS, &self.vdeflection.values(), name),
            Channel::Height => lookup(&HEIGHT_KEYS, &self.height.values(), name),
            _ => None,
        }
    }

    pub fn convert_value(&self, channel: Channel, raw: f64) -> Result<f64> {
        match channel {
            Channel::VDeflection => Ok(self.vdeflection.apply(raw)),
            Channel::Height => Ok(self.height.apply(raw)),
            other => Err(uncalibrated(other)),
        }
    }

    /// Converts decoded encoder samples.
    pub fn convert(&self, channel: Channel, raw: &[i32]) -> Result<Vec<f64>> {
        match channel {
            Channel::VDeflection => Ok(raw.iter().map(|&r| self.vdeflection.apply(r as f64)).collect()),
            Channel::Height => Ok(raw.iter().map(|&r| self.height.apply(r as f64)).collect()),
            other => Err(uncalibrated(other)),
        }
    }

    /// Converts encoder samples held as floats; non-finite input is rejected.
    pub fn convert_f64(&self, channel: Channel, raw: &[f64]) -> Result<Vec<f64>> {
        if !matches!(channel, Channel::VDeflection | Channel::Height) {
            return Err(uncalibrated(channel));
        }
        if let Some(pos) = raw.iter().position(|r| !r.is_finite()) {
            return Err(ForceFileError::InputType(format!(
                "sample {} is {}, expected a finite encoder value",
                pos, raw[pos]
            )));
        }
        raw.iter().map(|&r| self.convert_value(channel, r)).collect()
    }

    /// Channel given by name, as it appears in the header.
    pub fn convert_named(&self, channel: &str, raw: &[i32]) -> Result<Vec<f64>> {
        self.convert(channel.parse()?, raw)
    }
}

fn uncalibrated(channel: Channel) -> ForceFileError {
    ForceFileError::channel(channel.as_str(), "no conversion chain for this channel")
}

fn lookup<const N: usize>(table: &[(&str, &str); N], values: &[f64; N], name: &str) -> Option<f64> {
    table
        .iter()
        .position(|(field, _)| *field == name)
        .map(|pos| values[pos])
}

fn read_fields<const N: usize>(
    general: &PropertyMap,
    index: &str,
    table: &[(&str, &str); N],
) -> Result<[f64; N]> {
    let mut values = [0.0; N];
    for (value, (_, template)) in values.iter_mut().zip(table.iter()) {
        *value = general.require_f64(&expand_key(template, index))?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::channels;
    use crate::core::properties::parse_pairs;
    use crate::core::test_support::SHARED_BODY;
    use approx::assert_abs_diff_eq;

    fn fixture_calibration() -> Calibration {
        let general = parse_pairs(&SHARED_BODY).unwrap();
        let channels = channels::resolve(&general).unwrap();
        Calibration::extract(&general, &channels).unwrap()
    }

    #[test]
    fn test_extract_factors() {
        let cal = fixture_calibration();
        let v = Channel::VDeflection;
        assert_eq!(cal.factor(v, "raw multiplier"), Some(5.525411033343059e-9));
        assert_eq!(cal.factor(v, "raw offset"), Some(-6.075877326676198e-4));
        assert_eq!(cal.factor(v, "distance multiplier"), Some(7.730641603896163e-8));
        assert_eq!(cal.factor(v, "distance offset"), Some(0.0));
        assert_eq!(cal.factor(v, "force multiplier"), Some(0.01529211140472191));
        assert_eq!(cal.factor(v, "force offset"), Some(0.0));
        assert_eq!(cal.factor(Channel::Height, "force multiplier"), None);
    }

    #[test]
    fn test_extract_units() {
        let cal = fixture_calibration();
        assert_eq!(cal.unit(Channel::VDeflection), Some("N"));
        assert_eq!(cal.unit(Channel::Height), Some("m"));
        assert_eq!(cal.unit(Channel::HDeflection), None);
    }

    #[test]
    fn test_convert() {
        let cal = fixture_calibration();
        let force = cal.convert_value(Channel::VDeflection, -4454604.0).unwrap();
        assert_abs_diff_eq!(force, -2.98158446715e-11, epsilon = 1e-20);
        let height = cal.convert_value(Channel::Height, 468876141.0).unwrap();
        assert_abs_diff_eq!(height, 3.90831266155e-05, epsilon = 1e-15);

        let both = cal.convert(Channel::VDeflection, &[-4454604, 0]).unwrap();
        assert_eq!(both[0], force);
        assert_abs_diff_eq!(both[1], -6.075877326676198e-4 * 7.730641603896163e-8 * 0.01529211140472191);
    }

    #[test]
    fn test_convert_rejects_uncalibrated_channels() {
        let cal = fixture_calibration();
        assert!(cal
            .convert(Channel::HDeflection, &[1])
            .unwrap_err()
            .is_channel_resolution());
        assert!(cal
            .convert_named("lateralDeflection", &[1])
            .unwrap_err()
            .is_channel_resolution());
        assert!(cal.convert_named("height", &[1]).is_ok());
    }

    #[test]
    fn test_convert_rejects_non_finite() {
        let cal = fixture_calibration();
        let err = cal
            .convert_f64(Channel::Height, &[1.0, f64::NAN])
            .unwrap_err();
        assert!(err.is_input_type());
        assert_eq!(cal.convert_f64(Channel::Height, &[0.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_missing_coefficient() {
        let key = "lcd-info.1.conversion-set.conversion.force.scaling.offset";
        let mut body: Vec<&str> = SHARED_BODY.to_vec();
        body.retain(|l| !l.starts_with(key));
        let general = parse_pairs(&body).unwrap();
        let channels = channels::resolve(&general).unwrap();
        match Calibration::extract(&general, &channels).unwrap_err() {
            ForceFileError::PropertyCorruption { key: missing, .. } => assert_eq!(missing, key),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_unit_and_bad_number() {
        let mut body: Vec<&str> = SHARED_BODY.to_vec();
        body.retain(|l| !l.contains("nominal.scaling.unit.unit"));
        let general = parse_pairs(&body).unwrap();
        let channels = channels::resolve(&general).unwrap();
        assert!(Calibration::extract(&general, &channels)
            .unwrap_err()
            .is_property_corruption());

        let mut body: Vec<&str> = SHARED_BODY.to_vec();
        body.push("lcd-info.0.encoder.scaling.offset=zero");
        let general = parse_pairs(&body).unwrap();
        let channels = channels::resolve(&general).unwrap();
        assert!(Calibration::extract(&general, &channels)
            .unwrap_err()
            .is_property_corruption());
    }
}
