use ember_core::errors::ErrorInfo;
use ember_core::{uniform_on_sphere, BoxShape, EmberError, LedgerMut, RngHandle, SpinField};

use crate::event::{Event, SiteState};
use crate::moves::Move;

/// Replaces the spin of one random site with a fresh uniform orientation.
///
/// Operates on the simple-cubic lattice with periodic wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinFlip;

impl Move for SpinFlip {
    fn propose(&self, shape: BoxShape, config: &dyn SpinField, rng: &mut RngHandle) -> Event {
        let [nx, ny, nz] = shape.extents();
        let position = [rng.below(nx), rng.below(ny), rng.below(nz)];
        let so = config.spin(position);
        let sn = uniform_on_sphere(rng);
        Event {
            before: SiteState {
                position,
                spin: so,
            },
            after: SiteState { position, spin: sn },
        }
    }

    fn accept(
        &self,
        shape: BoxShape,
        config: &mut dyn SpinField,
        event: &Event,
        ledger: LedgerMut<'_>,
    ) -> Result<(), EmberError> {
        let LedgerMut {
            nbrlist,
            dui,
            energy_i,
            energy_total,
        } = ledger;
        if dui.len() != nbrlist.len() + 1 {
            return Err(EmberError::InvalidHamiltonianShape(
                ErrorInfo::new("dui-length", "dui must hold one self term plus one entry per neighbour")
                    .with_context("dui", dui.len().to_string())
                    .with_context("neighbours", nbrlist.len().to_string()),
            ));
        }

        let position = event.after.position;
        let site = config.site_index(position);
        let sites = energy_i.len();
        let out_of_range = std::iter::once(site)
            .chain(
                nbrlist
                    .iter()
                    .map(|nbr| config.site_index(shape.wrap(position, *nbr))),
            )
            .find(|&idx| idx >= sites);
        if let Some(idx) = out_of_range {
            return Err(EmberError::InvalidHamiltonianShape(
                ErrorInfo::new("site-index-out-of-range", "site index exceeds energy_i")
                    .with_context("index", idx.to_string())
                    .with_context("sites", sites.to_string()),
            ));
        }

        config.set_spin(position, event.after.spin);

        let pair_terms = &dui[1..];
        energy_i[site] += dui[0] + 0.5 * pair_terms.iter().sum::<f64>();
        for (nbr, du) in nbrlist.iter().zip(pair_terms) {
            let j = config.site_index(shape.wrap(position, *nbr));
            energy_i[j] += 0.5 * du;
        }
        *energy_total += dui.iter().sum::<f64>();
        Ok(())
    }
}
