//! Safetensors I/O for subject recordings.
//!
//! Reader: loads the `wrist/*` tensors of `S<n>.safetensors` into a
//! [`RawRecording`]. Writer: [`StWriter`], used to build recordings and to
//! dump intermediate arrays for inspection.
use ndarray::Array2;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::channel::Channel;
use crate::error::RecordingError;

// ── Low-level safetensors parser (no dependency on the `safetensors` crate's
//    tensor types — we just need raw bytes → ndarray). ─────────────────────────

struct Header {
    entries: HashMap<String, serde_json::Value>,
    data_start: usize,
}

fn parse_header(bytes: &[u8], path: &Path) -> Result<Header, RecordingError> {
    let format = |reason: String| RecordingError::Format { path: path.to_path_buf(), reason };

    let len_bytes: [u8; 8] = bytes
        .get(..8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| format("file too small for a safetensors header".into()))?;
    let n = u64::from_le_bytes(len_bytes) as usize;
    let raw = bytes
        .get(8..8usize.saturating_add(n))
        .ok_or_else(|| format(format!("header length {n} exceeds file size")))?;
    let entries: HashMap<String, serde_json::Value> =
        serde_json::from_slice(raw).map_err(|e| format(format!("bad header JSON: {e}")))?;
    Ok(Header { entries, data_start: 8 + n })
}

/// Decode one tensor as `f64` with shape `[N, k]` (1-D tensors become `[N, 1]`).
fn read_tensor(
    bytes: &[u8],
    header: &Header,
    key: &str,
    path: &Path,
) -> Result<Array2<f64>, RecordingError> {
    let format = |reason: String| RecordingError::Format { path: path.to_path_buf(), reason };
    let entry = &header.entries[key];

    let dtype = entry["dtype"]
        .as_str()
        .ok_or_else(|| format(format!("`{key}`: missing dtype")))?;
    let shape: Vec<usize> = entry["shape"]
        .as_array()
        .and_then(|dims| {
            dims.iter()
                .map(|d| d.as_u64().map(|v| v as usize))
                .collect::<Option<Vec<usize>>>()
        })
        .ok_or_else(|| format(format!("`{key}`: bad shape")))?;
    let offsets: Vec<usize> = entry["data_offsets"]
        .as_array()
        .and_then(|o| {
            o.iter()
                .map(|d| d.as_u64().map(|v| v as usize))
                .collect::<Option<Vec<usize>>>()
        })
        .filter(|o| o.len() == 2 && o[0] <= o[1])
        .ok_or_else(|| format(format!("`{key}`: bad data_offsets")))?;
    let raw = header
        .data_start
        .checked_add(offsets[0])
        .zip(header.data_start.checked_add(offsets[1]))
        .and_then(|(s, e)| bytes.get(s..e))
        .ok_or_else(|| format(format!("`{key}`: data out of bounds")))?;

    let width = match dtype {
        "F32" => 4,
        "F64" => 8,
        other => {
            return Err(RecordingError::UnsupportedDtype {
                key: key.to_string(),
                dtype: other.to_string(),
            })
        }
    };
    if raw.len() % width != 0 {
        return Err(format(format!(
            "`{key}`: {} data bytes is not a multiple of the {dtype} width",
            raw.len()
        )));
    }
    let values: Vec<f64> = if width == 4 {
        raw.chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect()
    } else {
        raw.chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect()
    };

    let (rows, cols) = match shape.as_slice() {
        [] => (1, 1),
        [n] => (*n, 1),
        [n, rest @ ..] => {
            let cols = rest
                .iter()
                .try_fold(1usize, |acc, &d| acc.checked_mul(d))
                .ok_or_else(|| format(format!("`{key}`: shape {shape:?} overflows")))?;
            (*n, cols)
        }
    };
    if rows.checked_mul(cols).is_none() {
        return Err(format(format!("`{key}`: shape {shape:?} overflows")));
    }
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| format(format!("`{key}`: shape {shape:?} does not match data: {e}")))
}

// ── Public structs ────────────────────────────────────────────────────────────

/// One subject's wrist recording.
///
/// Holds every wrist channel present in the file, each as `[N, k]` samples
/// (`k = 3` for ACC, `1` otherwise). Channels missing from the file are simply
/// not in the map.
#[derive(Debug, Clone, Default)]
pub struct RawRecording {
    pub channels: BTreeMap<Channel, Array2<f64>>,
}

impl RawRecording {
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let bytes = std::fs::read(path).map_err(|source| RecordingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, path)
    }

    /// Parse an in-memory safetensors image. `path` is only used in errors.
    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self, RecordingError> {
        let header = parse_header(bytes, path)?;
        let mut channels = BTreeMap::new();
        for ch in Channel::ALL {
            let key = ch.tensor_key();
            if header.entries.contains_key(&key) {
                channels.insert(ch, read_tensor(bytes, &header, &key, path)?);
            }
        }
        Ok(RawRecording { channels })
    }

    pub fn channel(&self, channel: Channel) -> Option<&Array2<f64>> {
        self.channels.get(&channel)
    }

    /// Channel samples flattened row-major to 1-D (numpy `flatten()`).
    pub fn flattened(&self, channel: Channel) -> Option<ndarray::Array1<f64>> {
        self.channel(channel).map(|a| a.iter().copied().collect())
    }
}

// ── Generic safetensors builder ───────────────────────────────────────────────

/// Simple safetensors file writer that handles F32, F64, and I32 tensors.
///
/// Usage:
/// ```rust,no_run
/// use wristfeat::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f64("wrist/EDA", &[0.41, 0.42, 0.40], &[3, 1]);
/// w.add_f32("wrist/TEMP", &[33.1f32, 33.1, 33.2], &[3]);
/// w.write(Path::new("/tmp/S2.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F32", shape.to_vec()));
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    pub fn add_f64_arr2(&mut self, name: &str, arr: &Array2<f64>) {
        let data: Vec<f64> = arr.iter().copied().collect();
        self.add_f64(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I32", shape.to_vec()));
    }

    /// Serialise to a safetensors byte image.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let mut hdr_bytes = serde_json::Value::Object(header_map).to_string().into_bytes();
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        hdr_bytes.extend(std::iter::repeat(b' ').take(pad));

        let mut out = Vec::with_capacity(8 + hdr_bytes.len() + offset);
        out.extend_from_slice(&(hdr_bytes.len() as u64).to_le_bytes());
        out.extend_from_slice(&hdr_bytes);
        for (_, data, _, _) in &self.entries {
            out.extend_from_slice(data);
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<(), RecordingError> {
        std::fs::write(path, self.to_bytes()).map_err(|source| RecordingError::Io {
            path: PathBuf::from(path),
            source,
        })
    }
}
