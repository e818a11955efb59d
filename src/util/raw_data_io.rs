use bincode::{config::*, serde::*};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ChirpSettings;
use crate::error::Result;

/// One recorded beat signal plus the chirp that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BeatFrame {
    pub frame_id: u64,
    pub timestamp_ns: u128,
    pub chirp: ChirpSettings,
    pub samples: Vec<f64>,
}

impl BeatFrame {
    pub fn new(frame_id: u64, chirp: ChirpSettings, samples: Vec<f64>) -> Self {
        let timestamp_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self { frame_id, timestamp_ns, chirp, samples }
    }
}

fn codec() -> Configuration<LittleEndian, Varint, NoLimit> {
    standard().with_little_endian()
}

/// Append a single frame to a session file (created if missing).
pub fn append_beat_frame<P: AsRef<Path>>(frame: &BeatFrame, filename: P) -> Result<()> {
    let encoded: Vec<u8> = encode_to_vec(frame, codec())?;

    let mut file = OpenOptions::new().create(true).append(true).open(filename.as_ref())?;
    file.write_all(&encoded)?;
    file.flush()?;
    debug!(
        "Appended frame {} ({} bytes) to {:?}",
        frame.frame_id,
        encoded.len(),
        filename.as_ref()
    );
    Ok(())
}

/// Load every frame from a session file.
///
/// A frame that fails to decode after at least one good frame is treated as
/// a partial trailing write and dropped.
pub fn playback_session<P: AsRef<Path>>(filename: P) -> Result<Vec<BeatFrame>> {
    let mut file = File::open(filename.as_ref())?;
    let mut encoded = Vec::new();
    file.read_to_end(&mut encoded)?;

    let mut frames = Vec::new();
    let mut offset = 0;
    while offset < encoded.len() {
        match decode_from_slice::<BeatFrame, _>(&encoded[offset..], codec()) {
            Ok((frame, len)) => {
                frames.push(frame);
                offset += len;
            }
            Err(e) => {
                if frames.is_empty() {
                    return Err(e.into());
                }
                warn!(
                    "Failed to decode at offset {} ({} bytes left): {}",
                    offset,
                    encoded.len() - offset,
                    e
                );
                break;
            }
        }
    }

    info!("Loaded {} frames from {:?}", frames.len(), filename.as_ref());
    Ok(frames)
}
