//! Feature Vector Assembly

use std::fmt;
use std::str::FromStr;

use crate::position::{coordinates, drift, pearson, TapPosition};
use crate::signal::{autocorrelation, detrended_fluctuation, fatigue, teager_kaiser_energy};
use crate::statistics::{variance, DescriptiveStats};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Number of names in the feature vocabulary
pub const FEATURE_COUNT: usize = 43;

/// Named feature in the tap-test vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureName {
    MeanTapInter,
    MedianTapInter,
    IqrTapInter,
    MinTapInter,
    MaxTapInter,
    SkewTapInter,
    KurTapInter,
    SdTapInter,
    MadTapInter,
    CvTapInter,
    RangeTapInter,
    TkeoTapInter,
    DfaTapInter,
    Ar1TapInter,
    Ar2TapInter,
    Fatigue10TapInter,
    Fatigue25TapInter,
    Fatigue50TapInter,
    MeanDriftLeft,
    MedianDriftLeft,
    IqrDriftLeft,
    MinDriftLeft,
    MaxDriftLeft,
    SkewDriftLeft,
    KurDriftLeft,
    SdDriftLeft,
    MadDriftLeft,
    CvDriftLeft,
    RangeDriftLeft,
    MeanDriftRight,
    MedianDriftRight,
    IqrDriftRight,
    MinDriftRight,
    MaxDriftRight,
    SkewDriftRight,
    KurDriftRight,
    SdDriftRight,
    MadDriftRight,
    CvDriftRight,
    RangeDriftRight,
    NumberTaps,
    ButtonNoneFreq,
    CorXy,
}

impl FeatureName {
    /// Whole vocabulary, in vector order
    pub const ALL: [FeatureName; FEATURE_COUNT] = {
        use FeatureName::*;
        [
            MeanTapInter, MedianTapInter, IqrTapInter, MinTapInter, MaxTapInter,
            SkewTapInter, KurTapInter, SdTapInter, MadTapInter, CvTapInter,
            RangeTapInter, TkeoTapInter, DfaTapInter, Ar1TapInter, Ar2TapInter,
            Fatigue10TapInter, Fatigue25TapInter, Fatigue50TapInter,
            MeanDriftLeft, MedianDriftLeft, IqrDriftLeft, MinDriftLeft, MaxDriftLeft,
            SkewDriftLeft, KurDriftLeft, SdDriftLeft, MadDriftLeft, CvDriftLeft,
            RangeDriftLeft,
            MeanDriftRight, MedianDriftRight, IqrDriftRight, MinDriftRight, MaxDriftRight,
            SkewDriftRight, KurDriftRight, SdDriftRight, MadDriftRight, CvDriftRight,
            RangeDriftRight,
            NumberTaps, ButtonNoneFreq, CorXy,
        ]
    };

    /// The 18 tap-interval features
    pub const INTERVAL: [FeatureName; 18] = {
        let mut names = [FeatureName::MeanTapInter; 18];
        let mut i = 0;
        while i < 18 {
            names[i] = Self::ALL[i];
            i += 1;
        }
        names
    };

    /// Wire name used by manifests and JSON output
    pub fn as_str(&self) -> &'static str {
        use FeatureName::*;
        match self {
            MeanTapInter => "meanTapInter",
            MedianTapInter => "medianTapInter",
            IqrTapInter => "iqrTapInter",
            MinTapInter => "minTapInter",
            MaxTapInter => "maxTapInter",
            SkewTapInter => "skewTapInter",
            KurTapInter => "kurTapInter",
            SdTapInter => "sdTapInter",
            MadTapInter => "madTapInter",
            CvTapInter => "cvTapInter",
            RangeTapInter => "rangeTapInter",
            TkeoTapInter => "tkeoTapInter",
            DfaTapInter => "dfaTapInter",
            Ar1TapInter => "ar1TapInter",
            Ar2TapInter => "ar2TapInter",
            Fatigue10TapInter => "fatigue10TapInter",
            Fatigue25TapInter => "fatigue25TapInter",
            Fatigue50TapInter => "fatigue50TapInter",
            MeanDriftLeft => "meanDriftLeft",
            MedianDriftLeft => "medianDriftLeft",
            IqrDriftLeft => "iqrDriftLeft",
            MinDriftLeft => "minDriftLeft",
            MaxDriftLeft => "maxDriftLeft",
            SkewDriftLeft => "skewDriftLeft",
            KurDriftLeft => "kurDriftLeft",
            SdDriftLeft => "sdDriftLeft",
            MadDriftLeft => "madDriftLeft",
            CvDriftLeft => "cvDriftLeft",
            RangeDriftLeft => "rangeDriftLeft",
            MeanDriftRight => "meanDriftRight",
            MedianDriftRight => "medianDriftRight",
            IqrDriftRight => "iqrDriftRight",
            MinDriftRight => "minDriftRight",
            MaxDriftRight => "maxDriftRight",
            SkewDriftRight => "skewDriftRight",
            KurDriftRight => "kurDriftRight",
            SdDriftRight => "sdDriftRight",
            MadDriftRight => "madDriftRight",
            CvDriftRight => "cvDriftRight",
            RangeDriftRight => "rangeDriftRight",
            NumberTaps => "numberTaps",
            ButtonNoneFreq => "buttonNoneFreq",
            CorXy => "corXY",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name outside the feature vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature name: {0}")]
pub struct UnknownFeature(pub String);

impl FromStr for FeatureName {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}

/// Keys for the eleven descriptive statistics of one signal
struct StatKeys {
    mean: FeatureName,
    median: FeatureName,
    iqr: FeatureName,
    min: FeatureName,
    max: FeatureName,
    skew: FeatureName,
    kur: FeatureName,
    sd: FeatureName,
    mad: FeatureName,
    cv: FeatureName,
    range: FeatureName,
}

impl StatKeys {
    fn all(&self) -> [FeatureName; 11] {
        [
            self.mean, self.median, self.iqr, self.min, self.max, self.skew,
            self.kur, self.sd, self.mad, self.cv, self.range,
        ]
    }
}

const INTERVAL_KEYS: StatKeys = StatKeys {
    mean: FeatureName::MeanTapInter,
    median: FeatureName::MedianTapInter,
    iqr: FeatureName::IqrTapInter,
    min: FeatureName::MinTapInter,
    max: FeatureName::MaxTapInter,
    skew: FeatureName::SkewTapInter,
    kur: FeatureName::KurTapInter,
    sd: FeatureName::SdTapInter,
    mad: FeatureName::MadTapInter,
    cv: FeatureName::CvTapInter,
    range: FeatureName::RangeTapInter,
};

/// Drift statistic groups. Both are computed over the full drift array;
/// taps are not split by hand.
const DRIFT_GROUPS: [StatKeys; 2] = [
    StatKeys {
        mean: FeatureName::MeanDriftLeft,
        median: FeatureName::MedianDriftLeft,
        iqr: FeatureName::IqrDriftLeft,
        min: FeatureName::MinDriftLeft,
        max: FeatureName::MaxDriftLeft,
        skew: FeatureName::SkewDriftLeft,
        kur: FeatureName::KurDriftLeft,
        sd: FeatureName::SdDriftLeft,
        mad: FeatureName::MadDriftLeft,
        cv: FeatureName::CvDriftLeft,
        range: FeatureName::RangeDriftLeft,
    },
    StatKeys {
        mean: FeatureName::MeanDriftRight,
        median: FeatureName::MedianDriftRight,
        iqr: FeatureName::IqrDriftRight,
        min: FeatureName::MinDriftRight,
        max: FeatureName::MaxDriftRight,
        skew: FeatureName::SkewDriftRight,
        kur: FeatureName::KurDriftRight,
        sd: FeatureName::SdDriftRight,
        mad: FeatureName::MadDriftRight,
        cv: FeatureName::CvDriftRight,
        range: FeatureName::RangeDriftRight,
    },
];

/// Computed features keyed by vocabulary name.
///
/// Only computed features are present. Values are always finite: anything
/// else is stored as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [Option<f64>; FEATURE_COUNT],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [None; FEATURE_COUNT],
        }
    }
}

impl FeatureVector {
    /// Create an empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature, replacing non-finite values with 0
    pub fn insert(&mut self, name: FeatureName, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.values[name.index()] = Some(value);
    }

    /// Value of a feature, if computed
    pub fn get(&self, name: FeatureName) -> Option<f64> {
        self.values[name.index()]
    }

    /// Value of a feature looked up by wire name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        name.parse::<FeatureName>().ok().and_then(|n| self.get(n))
    }

    /// Whether a feature was computed
    pub fn contains(&self, name: FeatureName) -> bool {
        self.get(name).is_some()
    }

    /// Number of computed features
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Computed features in vocabulary order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ALL
            .iter()
            .zip(self.values.iter())
            .filter_map(|(name, value)| value.map(|v| (*name, v)))
    }

    fn insert_stats(&mut self, keys: &StatKeys, stats: &DescriptiveStats) {
        self.insert(keys.mean, stats.mean);
        self.insert(keys.median, stats.median);
        self.insert(keys.iqr, stats.iqr);
        self.insert(keys.min, stats.min);
        self.insert(keys.max, stats.max);
        self.insert(keys.skew, stats.skewness);
        self.insert(keys.kur, stats.kurtosis);
        self.insert(keys.sd, stats.std_dev);
        self.insert(keys.mad, stats.mad);
        self.insert(keys.cv, stats.cv);
        self.insert(keys.range, stats.range);
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.as_str(), &value)?;
        }
        map.end()
    }
}

/// Feature extractor configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractorConfig {
    /// Emit coordinate and correlation diagnostics
    #[serde(default)]
    pub debug: bool,
}

/// Feature extractor for tap interval and tap position data
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract features from tap intervals and optional tap positions
    pub fn extract(&self, intervals: &[f64], positions: Option<&[TapPosition]>) -> FeatureVector {
        let mut features = FeatureVector::new();

        if intervals.len() < 2 {
            debug!("Only {} tap intervals, emitting zeroed interval features", intervals.len());
            for name in FeatureName::INTERVAL {
                features.insert(name, 0.0);
            }
            return features;
        }

        self.interval_features(intervals, &mut features);

        match positions.filter(|p| !p.is_empty()) {
            Some(positions) => self.position_features(positions, &mut features),
            None => {
                for keys in &DRIFT_GROUPS {
                    for name in keys.all() {
                        features.insert(name, 0.0);
                    }
                }
                // Approximate tap count from intervals
                features.insert(FeatureName::NumberTaps, (intervals.len() + 1) as f64);
                features.insert(FeatureName::ButtonNoneFreq, 0.0);
                features.insert(FeatureName::CorXy, 0.0);
            }
        }

        debug!("Extracted {} features from {} intervals", features.len(), intervals.len());
        features
    }

    fn interval_features(&self, intervals: &[f64], features: &mut FeatureVector) {
        let stats = DescriptiveStats::compute(intervals);
        features.insert_stats(&INTERVAL_KEYS, &stats);

        features.insert(FeatureName::TkeoTapInter, teager_kaiser_energy(intervals));
        features.insert(FeatureName::DfaTapInter, detrended_fluctuation(intervals));

        // Autoregressive coefficients
        let (ar1, ar2) = if intervals.len() > 2 {
            (
                autocorrelation(intervals, 1).unwrap_or(0.0),
                autocorrelation(intervals, 2).unwrap_or(0.0),
            )
        } else {
            (0.0, 0.0)
        };
        features.insert(FeatureName::Ar1TapInter, ar1);
        features.insert(FeatureName::Ar2TapInter, ar2);

        // Fatigue metrics
        features.insert(FeatureName::Fatigue10TapInter, fatigue(intervals, 10, 10));
        features.insert(FeatureName::Fatigue25TapInter, fatigue(intervals, 25, 4));
        features.insert(FeatureName::Fatigue50TapInter, fatigue(intervals, 50, 2));
    }

    fn position_features(&self, positions: &[TapPosition], features: &mut FeatureVector) {
        let drift = drift(positions);
        let stats = DescriptiveStats::compute(&drift);
        for keys in &DRIFT_GROUPS {
            features.insert_stats(keys, &stats);
        }

        features.insert(FeatureName::NumberTaps, positions.len() as f64);
        // Not available from this data source
        features.insert(FeatureName::ButtonNoneFreq, 0.0);

        let (xs, ys) = coordinates(positions);
        if self.config.debug {
            log_coordinates(&xs, &ys);
        }

        let cor = pearson(&xs, &ys);
        if self.config.debug {
            match cor {
                Some(r) => debug!(correlation = r, "corXY computed"),
                None => debug!("zero variance or undefined correlation, corXY set to 0"),
            }
        }
        features.insert(FeatureName::CorXy, cor.unwrap_or(0.0));
    }
}

fn log_coordinates(xs: &[f64], ys: &[f64]) {
    for (axis, values) in [("x", xs), ("y", ys)] {
        let mut distinct: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        distinct.sort_unstable();
        distinct.dedup();

        debug!(
            axis,
            head = ?&values[..values.len().min(5)],
            len = values.len(),
            distinct = distinct.len(),
            has_nan = values.iter().any(|v| v.is_nan()),
            variance = variance(values),
            "tap coordinates"
        );
    }
}

/// Extract features with the default extractor configuration
pub fn extract_features(intervals: &[f64], positions: Option<&[TapPosition]>) -> FeatureVector {
    FeatureExtractor::default().extract(intervals, positions)
}
