use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::features::cart::guest_cart::GuestCart;
use crate::shared::constants::MAX_LINE_QUANTITY;

/// Final quantity of one persisted cart line after a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub lines: Vec<MergedLine>,
    /// Guest lines whose product no longer exists
    pub skipped_product_ids: Vec<Uuid>,
}

/// Fold a guest cart into the persisted quantities.
///
/// A product already in the persisted cart gets the guest quantity added to it;
/// any other product gets a new line with the guest quantity. Products missing
/// from `known_products` are skipped.
pub fn plan_merge(
    guest: &GuestCart,
    persisted: &HashMap<Uuid, i32>,
    known_products: &HashSet<Uuid>,
) -> MergePlan {
    let mut plan = MergePlan::default();

    for (&product_id, &guest_quantity) in guest.items() {
        if !known_products.contains(&product_id) {
            plan.skipped_product_ids.push(product_id);
            continue;
        }

        let quantity = persisted
            .get(&product_id)
            .copied()
            .unwrap_or(0)
            .saturating_add(guest_quantity)
            .min(MAX_LINE_QUANTITY);

        plan.lines.push(MergedLine {
            product_id,
            quantity,
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(lines: &[(Uuid, i32)]) -> GuestCart {
        let mut cart = GuestCart::new();
        for (id, q) in lines {
            cart.add(*id, *q);
        }
        cart
    }

    #[test]
    fn test_guest_into_empty_cart() {
        let a = Uuid::now_v7();
        let plan = plan_merge(
            &guest(&[(a, 3)]),
            &HashMap::new(),
            &HashSet::from([a]),
        );

        assert_eq!(
            plan.lines,
            vec![MergedLine {
                product_id: a,
                quantity: 3
            }]
        );
        assert!(plan.skipped_product_ids.is_empty());
    }

    #[test]
    fn test_quantities_add_for_existing_lines() {
        let (a, b, c) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        let persisted = HashMap::from([(a, 2), (c, 7)]);
        let plan = plan_merge(
            &guest(&[(a, 3), (b, 1)]),
            &persisted,
            &HashSet::from([a, b, c]),
        );

        let by_product: HashMap<Uuid, i32> = plan
            .lines
            .iter()
            .map(|l| (l.product_id, l.quantity))
            .collect();

        assert_eq!(by_product.get(&a), Some(&5));
        assert_eq!(by_product.get(&b), Some(&1));
        // untouched persisted lines are not part of the plan
        assert_eq!(by_product.get(&c), None);
    }

    #[test]
    fn test_missing_products_are_skipped() {
        let (a, gone) = (Uuid::now_v7(), Uuid::now_v7());
        let plan = plan_merge(
            &guest(&[(a, 1), (gone, 2)]),
            &HashMap::new(),
            &HashSet::from([a]),
        );

        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.skipped_product_ids, vec![gone]);
    }

    #[test]
    fn test_merged_quantity_is_capped() {
        let a = Uuid::now_v7();
        let plan = plan_merge(
            &guest(&[(a, 900)]),
            &HashMap::from([(a, 500)]),
            &HashSet::from([a]),
        );
        assert_eq!(plan.lines[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_empty_guest_cart_plans_nothing() {
        let plan = plan_merge(&GuestCart::new(), &HashMap::new(), &HashSet::new());
        assert_eq!(plan, MergePlan::default());
    }
}
