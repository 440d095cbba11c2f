//! Pure balance derivation over movement streams.
//!
//! Nothing here touches a store or has side effects: every function folds a
//! slice of movements that the caller already read. Workflows call these
//! inside the same per-run critical section as the write they gate, so the
//! fold and the append see one consistent stream.

use std::collections::BTreeMap;

use labelstock_core::{DistributorId, Location};

use crate::movement::InventoryMovement;

/// Quantity currently held at `location`: sum of movements in, minus sum of
/// movements out. An empty stream folds to 0.
pub fn balance_at(movements: &[InventoryMovement], location: Location) -> i64 {
    movements.iter().fold(0, |acc, m| {
        let mut acc = acc;
        if m.to == location {
            acc += m.quantity.as_i64();
        }
        if m.from == location {
            acc -= m.quantity.as_i64();
        }
        acc
    })
}

/// Net units out of the warehouse for the run: allocations (and outbound
/// adjustments) minus returns (and inbound adjustments). Transfer transit
/// legs cancel. This is what the production-run ceiling is checked
/// against, so returned stock re-enters allocation capacity.
pub fn total_allocated(movements: &[InventoryMovement]) -> i64 {
    -balance_at(movements, Location::Warehouse)
}

/// Net warehouse balance for the stream (returns and adjustments in, minus
/// allocations and adjustments out). The warehouse is not balance-checked;
/// this exists for display.
pub fn warehouse_balance(movements: &[InventoryMovement]) -> i64 {
    balance_at(movements, Location::Warehouse)
}

/// Current balance per distributor, restricted to distributors that still
/// hold a positive quantity.
pub fn balances_by_distributor(movements: &[InventoryMovement]) -> BTreeMap<DistributorId, i64> {
    let mut balances: BTreeMap<DistributorId, i64> = BTreeMap::new();
    for m in movements {
        if let Some(id) = m.to.distributor_id() {
            *balances.entry(id).or_insert(0) += m.quantity.as_i64();
        }
        if let Some(id) = m.from.distributor_id() {
            *balances.entry(id).or_insert(0) -= m.quantity.as_i64();
        }
    }
    balances.retain(|_, balance| *balance > 0);
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementDraft;
    use chrono::Utc;
    use labelstock_core::{MovementId, ProductionRunId, Quantity, ReferenceId};
    use proptest::prelude::*;

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn recorded(draft: MovementDraft) -> InventoryMovement {
        InventoryMovement {
            id: MovementId::new(),
            production_run_id: draft.production_run_id,
            from: draft.from,
            to: draft.to,
            quantity: draft.quantity,
            movement_type: draft.movement_type,
            occurred_at: Utc::now(),
            reference_id: draft.reference_id,
        }
    }

    #[test]
    fn empty_stream_folds_to_zero_everywhere() {
        assert_eq!(balance_at(&[], Location::Warehouse), 0);
        assert_eq!(
            balance_at(&[], Location::Distributor(DistributorId::new())),
            0
        );
        assert_eq!(total_allocated(&[]), 0);
        assert!(balances_by_distributor(&[]).is_empty());
    }

    #[test]
    fn allocate_sell_return_fold_as_expected() {
        let run = ProductionRunId::new();
        let distributor = DistributorId::new();
        let movements = vec![
            recorded(MovementDraft::allocation(
                run,
                distributor,
                qty(200),
                ReferenceId::new(),
            )),
            recorded(MovementDraft::sale(
                run,
                distributor,
                qty(50),
                ReferenceId::new(),
            )),
            recorded(MovementDraft::distributor_return(
                run,
                distributor,
                qty(30),
                ReferenceId::new(),
            )),
        ];

        assert_eq!(balance_at(&movements, Location::Distributor(distributor)), 120);
        assert_eq!(balance_at(&movements, Location::External), 50);
        assert_eq!(warehouse_balance(&movements), -170);
        assert_eq!(total_allocated(&movements), 170);
    }

    #[test]
    fn returned_units_reduce_total_allocated_but_sales_do_not() {
        let run = ProductionRunId::new();
        let distributor = DistributorId::new();
        let mut movements = vec![
            recorded(MovementDraft::allocation(
                run,
                distributor,
                qty(100),
                ReferenceId::new(),
            )),
            recorded(MovementDraft::sale(
                run,
                distributor,
                qty(20),
                ReferenceId::new(),
            )),
        ];
        // A sale moves stock distributor-to-external; the warehouse never
        // sees it back.
        assert_eq!(total_allocated(&movements), 100);

        movements.push(recorded(MovementDraft::distributor_return(
            run,
            distributor,
            qty(40),
            ReferenceId::new(),
        )));
        assert_eq!(total_allocated(&movements), 60);
        assert_eq!(warehouse_balance(&movements), -60);
    }

    #[test]
    fn transfer_legs_shift_balance_between_distributors() {
        let run = ProductionRunId::new();
        let a = DistributorId::new();
        let b = DistributorId::new();
        let mut movements = vec![recorded(MovementDraft::allocation(
            run,
            a,
            qty(100),
            ReferenceId::new(),
        ))];
        let (out, incoming) =
            MovementDraft::transfer_pair(run, a, b, qty(60), ReferenceId::new()).unwrap();
        movements.push(recorded(out));
        movements.push(recorded(incoming));

        assert_eq!(balance_at(&movements, Location::Distributor(a)), 40);
        assert_eq!(balance_at(&movements, Location::Distributor(b)), 60);
        // The transit legs cancel out at the warehouse.
        assert_eq!(warehouse_balance(&movements), -100);
    }

    #[test]
    fn balances_by_distributor_drops_emptied_distributors() {
        let run = ProductionRunId::new();
        let a = DistributorId::new();
        let b = DistributorId::new();
        let movements = vec![
            recorded(MovementDraft::allocation(run, a, qty(80), ReferenceId::new())),
            recorded(MovementDraft::allocation(run, b, qty(20), ReferenceId::new())),
            recorded(MovementDraft::sale(run, b, qty(20), ReferenceId::new())),
        ];

        let balances = balances_by_distributor(&movements);
        assert_eq!(balances.get(&a), Some(&80));
        assert!(!balances.contains_key(&b));
    }

    /// Any movement adds to exactly one location what it removes from
    /// another, so summing balances across every location that appears in
    /// the stream (warehouse, external, all distributors) must give zero.
    fn location_sum(movements: &[InventoryMovement]) -> i64 {
        let mut locations = vec![Location::Warehouse, Location::External];
        for m in movements {
            for loc in [m.from, m.to] {
                if !locations.contains(&loc) {
                    locations.push(loc);
                }
            }
        }
        locations
            .into_iter()
            .map(|loc| balance_at(movements, loc))
            .sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Conservation: no fold over any mix of movement kinds creates or
        /// destroys quantity.
        #[test]
        fn quantity_is_conserved_across_all_locations(
            steps in prop::collection::vec((0u8..5, 1i64..1_000i64), 1..40)
        ) {
            let run = ProductionRunId::new();
            let a = DistributorId::new();
            let b = DistributorId::new();
            let mut movements = Vec::new();

            for (kind, amount) in steps {
                let quantity = qty(amount);
                let reference = ReferenceId::new();
                match kind {
                    0 => movements.push(recorded(MovementDraft::allocation(run, a, quantity, reference))),
                    1 => movements.push(recorded(MovementDraft::sale(run, a, quantity, reference))),
                    2 => movements.push(recorded(MovementDraft::distributor_return(run, a, quantity, reference))),
                    3 => {
                        let (out, incoming) =
                            MovementDraft::transfer_pair(run, a, b, quantity, reference).unwrap();
                        movements.push(recorded(out));
                        movements.push(recorded(incoming));
                    }
                    _ => movements.push(recorded(
                        MovementDraft::adjustment(
                            run,
                            Location::Distributor(b),
                            Location::External,
                            quantity,
                            reference,
                        )
                        .unwrap(),
                    )),
                }
            }

            prop_assert_eq!(location_sum(&movements), 0);
        }
    }
}
