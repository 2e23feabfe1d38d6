//! Checks of the sequences read from `shapes.txt` and `stop_times.txt`
//!
//! The points of a shape (and the stop times of a trip) are sorted by sequence
//! number, then compacted in place: a write cursor moves the kept elements to the
//! front and the tail is truncated once the whole sequence was visited.
use crate::objects::{Shape, ShapePoint, StopTime, Trip};
use crate::ParseOptions;
use log::warn;

/// An inconsistency that the options did not allow to fix
#[derive(Debug, PartialEq)]
pub(crate) struct Violation {
    /// Sequence number of the faulty element
    pub(crate) sequence: u32,
    pub(crate) message: String,
}

/// An element of an ordered sequence along a path
trait Sequenced {
    fn sequence(&self) -> u32;
    fn dist_traveled(&self) -> Option<f32>;
    fn clear_dist_traveled(&mut self);
}

impl Sequenced for ShapePoint {
    fn sequence(&self) -> u32 {
        self.sequence
    }
    fn dist_traveled(&self) -> Option<f32> {
        self.dist_traveled
    }
    fn clear_dist_traveled(&mut self) {
        self.dist_traveled = None;
    }
}

impl Sequenced for StopTime {
    fn sequence(&self) -> u32 {
        self.stop_sequence
    }
    fn dist_traveled(&self) -> Option<f32> {
        self.shape_dist_traveled
    }
    fn clear_dist_traveled(&mut self) {
        self.shape_dist_traveled = None;
    }
}

/// Sorts the points of the shape and removes (or fixes) those going backward
pub(crate) fn check_shape(shape: &mut Shape, options: &ParseOptions) -> Result<(), Violation> {
    shape.points.sort_by_key(|p| p.sequence);
    let owner = format!("shape '{}'", shape.id);
    compact(&mut shape.points, &owner, "point", options, |_, _| false)
}

/// Sorts the stop times of the trip and removes (or fixes) those going backward
///
/// A stop time arriving before the departure of the previous one is never fixed:
/// it is either dropped or fatal.
pub(crate) fn check_stop_times(trip: &mut Trip, options: &ParseOptions) -> Result<(), Violation> {
    trip.stop_times.sort_by_key(|st| st.stop_sequence);
    let owner = format!("trip '{}'", trip.id);
    compact(
        &mut trip.stop_times,
        &owner,
        "stop time",
        options,
        |previous, current| match (previous.departure_time, current.arrival_time) {
            (Some(departure), Some(arrival)) => arrival < departure,
            _ => false,
        },
    )
}

fn compact<T: Sequenced>(
    items: &mut Vec<T>,
    owner: &str,
    element: &str,
    options: &ParseOptions,
    goes_back_in_time: impl Fn(&T, &T) -> bool,
) -> Result<(), Violation> {
    // Greatest distance among the kept elements
    let mut max_dist: Option<f32> = None;
    let mut write = 0;
    for read in 0..items.len() {
        let sequence = items[read].sequence();
        if write > 0 && goes_back_in_time(&items[write - 1], &items[read]) {
            let message = format!(
                "In {} for {} with seq={} the arrival time is before the departure at the previous stop",
                owner, element, sequence
            );
            if !options.drop_erroneous {
                return Err(Violation { sequence, message });
            }
            warn!("{}, dropping it", message);
            continue;
        }
        if let Some(dist) = items[read].dist_traveled() {
            match max_dist {
                Some(max) if dist < max => {
                    let message = format!(
                        "In {} for {} with seq={} shape_dist_traveled does not increase along with the sequence ({} > {})",
                        owner, element, sequence, max, dist
                    );
                    if options.use_default_on_error {
                        warn!("{}, removing the distance", message);
                        items[read].clear_dist_traveled();
                    } else if options.drop_erroneous {
                        warn!("{}, dropping it", message);
                        continue;
                    } else {
                        return Err(Violation { sequence, message });
                    }
                }
                _ => max_dist = Some(dist),
            }
        }
        items.swap(write, read);
        write += 1;
    }
    items.truncate(write);
    Ok(())
}
