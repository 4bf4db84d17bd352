//! Passthrough remux of a composition.
//!
//! The render copies packets straight from the source container into the
//! destination, so the source encoding is preserved. Each segment is cut by
//! seeking to its start and dropping pre-roll packets; timestamps are
//! shifted so segments land back-to-back on the output timeline. All FFmpeg
//! calls in the export path live in this module.

use std::path::Path;

use ffmpeg_next as ffmpeg;
use ffmpeg_next::Rational;

use crate::compose::{Composition, Segment};
use crate::core::time::{self, Time};
use crate::export::engine::{ExportError, Preset};

/// Per-output-stream copy plan, indexed by input stream.
struct StreamPlan {
    out_index: usize,
    out_time_base: Rational,
}

/// Render a composition to `destination` by packet copy.
pub(crate) fn render(
    composition: &Composition,
    destination: &Path,
    preset: Preset,
) -> Result<(), ExportError> {
    ffmpeg::init()?;

    let source_path = composition.source().path().to_path_buf();
    let mut ictx = ffmpeg::format::input(&source_path)?;
    let mut octx = ffmpeg::format::output(&destination)?;

    let stream_count = ictx.streams().count();
    let mut plan: Vec<Option<StreamPlan>> = (0..stream_count).map(|_| None).collect();

    for (index, ist) in ictx.streams().enumerate() {
        let keep =
            index == composition.video_stream() || Some(index) == composition.audio_stream();
        if !keep {
            continue;
        }

        let mut ost = octx.add_stream(ffmpeg::encoder::find(ffmpeg::codec::Id::None))?;
        ost.set_parameters(ist.parameters());
        // Codec tags are container-specific; let the muxer pick its own
        unsafe {
            (*ost.parameters().as_mut_ptr()).codec_tag = 0;
        }

        if index == composition.video_stream() {
            let degrees = rotation_tag(composition.video_transform().rotation_degrees());
            if degrees != 0 {
                let mut metadata = ffmpeg::Dictionary::new();
                metadata.set("rotate", &degrees.to_string());
                ost.set_metadata(metadata);
            }
        }

        plan[index] = Some(StreamPlan {
            out_index: ost.index(),
            out_time_base: ist.time_base(),
        });
    }

    octx.set_metadata(ictx.metadata().to_owned());

    if preset.faststart() {
        let mut options = ffmpeg::Dictionary::new();
        options.set("movflags", "+faststart");
        octx.write_header_with(options)?;
    } else {
        octx.write_header()?;
    }

    // The muxer may adjust stream time bases during write_header
    for entry in plan.iter_mut().flatten() {
        if let Some(ost) = octx.stream(entry.out_index) {
            entry.out_time_base = ost.time_base();
        }
    }

    for segment in composition.segments() {
        copy_segment(&mut ictx, &mut octx, &plan, segment)?;
    }

    octx.write_trailer()?;
    Ok(())
}

/// Copy one segment's packets, shifted onto the output timeline.
fn copy_segment(
    ictx: &mut ffmpeg::format::context::Input,
    octx: &mut ffmpeg::format::context::Output,
    plan: &[Option<StreamPlan>],
    segment: &Segment,
) -> Result<(), ExportError> {
    let start_ns = segment.source.start();
    let end_ns = segment.source.end();

    // Seek lands on the keyframe at or before the cut; packets between the
    // keyframe and the cut are dropped, and players resync at the next
    // keyframe in the copied stream.
    let start_us = time::to_micros(start_ns);
    ictx.seek(start_us, ..start_us)?;

    let mut finished = vec![false; plan.len()];

    for (stream, mut packet) in ictx.packets() {
        let index = stream.index();
        let Some(Some(entry)) = plan.get(index) else {
            continue;
        };
        if finished[index] {
            continue;
        }

        let in_time_base = stream.time_base();
        let Some(pts) = packet.pts() else {
            continue;
        };

        let pts_ns = ts_to_ns(pts, in_time_base);
        if pts_ns < start_ns {
            continue;
        }
        if pts_ns >= end_ns {
            finished[index] = true;
            let all_done = plan
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_some())
                .all(|(i, _)| finished[i]);
            if all_done {
                break;
            }
            continue;
        }

        // Shift so the cut point lands at the segment's output offset
        let shift = ns_to_ts(segment.offset - start_ns, in_time_base);
        packet.set_pts(Some(pts + shift));
        if let Some(dts) = packet.dts() {
            packet.set_dts(Some(dts + shift));
        }

        packet.rescale_ts(in_time_base, entry.out_time_base);
        packet.set_position(-1);
        packet.set_stream(entry.out_index);
        packet.write_interleaved(octx)?;
    }

    Ok(())
}

/// Convert a stream timestamp to nanoseconds.
fn ts_to_ns(ts: i64, time_base: Rational) -> Time {
    (ts as i128 * time_base.numerator() as i128 * 1_000_000_000
        / time_base.denominator() as i128) as Time
}

/// Convert nanoseconds to a stream timestamp. Truncates toward zero.
fn ns_to_ts(ns: Time, time_base: Rational) -> i64 {
    (ns as i128 * time_base.denominator() as i128
        / (time_base.numerator() as i128 * 1_000_000_000)) as i64
}

/// Normalize a corrective rotation to the container's 0..360 convention.
fn rotation_tag(degrees: f64) -> i64 {
    ((degrees.round() as i64 % 360) + 360) % 360
}
