//! Joining open line fragments end-to-end into closed rings.

use std::collections::HashMap;

use geo::{Coord, LineString};

use crate::geometry::is_simple_ring;

type EndpointKey = (u64, u64);

const fn endpoint_key(coord: Coord<f64>) -> EndpointKey {
    (coord.x.to_bits(), coord.y.to_bits())
}

/// Rings recovered from a set of fragments.
#[derive(Debug, Default)]
pub(super) struct Stitched {
    /// Closed, simple rings.
    pub(super) rings: Vec<LineString<f64>>,
    /// Chains that stayed open or closed into an invalid ring.
    pub(super) unusable_chains: usize,
}

/// Greedily join `fragments` at shared endpoints, reversing a fragment when
/// it meets the chain back to front.
pub(super) fn stitch<'a, I>(fragments: I) -> Stitched
where
    I: IntoIterator<Item = &'a LineString<f64>>,
{
    let mut pending: Vec<Option<Vec<Coord<f64>>>> = fragments
        .into_iter()
        .filter(|fragment| fragment.0.len() >= 2)
        .map(|fragment| Some(fragment.0.clone()))
        .collect();

    let mut endpoints: HashMap<EndpointKey, Vec<usize>> = HashMap::new();
    for (slot, fragment) in pending.iter().enumerate() {
        let Some(coords) = fragment else { continue };
        for end in [coords.first(), coords.last()].into_iter().flatten() {
            endpoints.entry(endpoint_key(*end)).or_default().push(slot);
        }
    }

    let mut stitched = Stitched::default();
    for slot in 0..pending.len() {
        let Some(mut chain) = pending.get_mut(slot).and_then(Option::take) else {
            continue;
        };
        let mut flipped = false;
        loop {
            if is_closed(&chain) {
                let ring = LineString::new(chain);
                if is_simple_ring(&ring) {
                    stitched.rings.push(ring);
                } else {
                    stitched.unusable_chains += 1;
                }
                break;
            }
            let Some(tail) = chain.last().copied() else {
                break;
            };
            match take_neighbour(&mut pending, &endpoints, tail) {
                Some(next) => append(&mut chain, next, tail),
                None if !flipped => {
                    chain.reverse();
                    flipped = true;
                }
                None => {
                    stitched.unusable_chains += 1;
                    break;
                }
            }
        }
    }
    stitched
}

fn is_closed(chain: &[Coord<f64>]) -> bool {
    chain.len() >= 4 && chain.first() == chain.last()
}

fn take_neighbour(
    pending: &mut [Option<Vec<Coord<f64>>>],
    endpoints: &HashMap<EndpointKey, Vec<usize>>,
    tail: Coord<f64>,
) -> Option<Vec<Coord<f64>>> {
    endpoints
        .get(&endpoint_key(tail))?
        .iter()
        .find_map(|&slot| pending.get_mut(slot).and_then(Option::take))
}

fn append(chain: &mut Vec<Coord<f64>>, mut next: Vec<Coord<f64>>, tail: Coord<f64>) {
    if next.first() != Some(&tail) {
        next.reverse();
    }
    chain.extend(next.into_iter().skip(1));
}
