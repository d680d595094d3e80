//! Integration tests for the full movement pipeline.
//!
//! Tests: MovementRequest → MovementService → ProductStore + MovementStore
//!
//! Verifies:
//! - Ledger and product row stay consistent across mixed sequences
//! - Per-product serialization holds under concurrent writers
//! - Rejected movements leave no trace

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use stockroom_auth::InMemoryUserDirectory;
    use stockroom_catalog::{NewProduct, Product};
    use stockroom_core::{ProductId, UserId};
    use stockroom_movements::{chain_is_consistent, MovementRequest, MovementType};

    use crate::movement_service::MovementService;
    use crate::store::{
        InMemoryMovementStore, InMemoryProductStore, MovementFilter, ProductStore,
    };

    type Service = MovementService<
        Arc<InMemoryProductStore>,
        Arc<InMemoryMovementStore>,
        Arc<InMemoryUserDirectory>,
    >;

    fn setup(initial_quantity: i64) -> (Arc<Service>, Arc<InMemoryProductStore>, ProductId) {
        let products = Arc::new(InMemoryProductStore::new());
        let movements = Arc::new(InMemoryMovementStore::new());
        let users = Arc::new(InMemoryUserDirectory::new());

        let product = Product::create(
            ProductId::new(),
            NewProduct {
                sku: "INT-1".to_string(),
                name: "Integration Widget".to_string(),
                category: "general".to_string(),
                description: None,
                quantity: Some(initial_quantity),
                reorder_level: None,
                unit_price: None,
                supplier: None,
                location: None,
                weight_value: None,
                weight_unit: None,
            },
            Utc::now(),
        )
        .unwrap();
        let product_id = product.id;
        products.insert(product).unwrap();

        let service = Arc::new(MovementService::new(
            products.clone(),
            movements,
            users,
        ));
        (service, products, product_id)
    }

    fn request(product_id: ProductId, movement_type: MovementType, quantity: i64) -> MovementRequest {
        MovementRequest {
            product_id,
            movement_type,
            quantity,
            reason: "integration".to_string(),
            reference: None,
            notes: None,
            performed_by: UserId::new(),
        }
    }

    #[test]
    fn concurrent_drain_loses_no_update() {
        let n = 32;
        let (service, products, product_id) = setup(n);

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || {
                    service.apply(request(product_id, MovementType::Out, 1))
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let product = products.get(product_id).unwrap().unwrap();
        assert_eq!(product.quantity, 0);
        assert_eq!(product.total_out, n);

        let mut history: Vec<_> = service
            .history(product_id)
            .unwrap()
            .into_iter()
            .map(|v| v.movement)
            .collect();
        assert_eq!(history.len(), n as usize);

        // No duplicate balances, no lost update: the snapshots must form one
        // descending chain. Threads can land on the same timestamp tick, so
        // order by the balance itself before auditing.
        history.sort_by_key(|r| std::cmp::Reverse(r.previous_stock));
        assert!(chain_is_consistent(&history));
        assert_eq!(history.first().unwrap().previous_stock, n);
        assert_eq!(history.last().unwrap().new_stock, 0);
    }

    #[test]
    fn concurrent_overdraw_admits_exactly_the_available_stock() {
        let available = 10;
        let attempts = 25;
        let (service, products, product_id) = setup(available);

        let handles: Vec<_> = (0..attempts)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || {
                    service
                        .apply(request(product_id, MovementType::Out, 1))
                        .is_ok()
                })
            })
            .collect();

        let succeeded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count() as i64;

        assert_eq!(succeeded, available);
        let product = products.get(product_id).unwrap().unwrap();
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn movements_on_different_products_are_independent() {
        let (service, products, first) = setup(100);

        let second_product = Product::create(
            ProductId::new(),
            NewProduct {
                sku: "INT-2".to_string(),
                name: "Other Widget".to_string(),
                category: "general".to_string(),
                description: None,
                quantity: Some(100),
                reorder_level: None,
                unit_price: None,
                supplier: None,
                location: None,
                weight_value: None,
                weight_unit: None,
            },
            Utc::now(),
        )
        .unwrap();
        let second = second_product.id;
        products.insert(second_product).unwrap();

        let handles: Vec<_> = [first, second]
            .into_iter()
            .flat_map(|product_id| {
                (0..20).map(move |_| product_id)
            })
            .map(|product_id| {
                let service = service.clone();
                std::thread::spawn(move || {
                    service.apply(request(product_id, MovementType::Out, 1)).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(products.get(first).unwrap().unwrap().quantity, 80);
        assert_eq!(products.get(second).unwrap().unwrap().quantity, 80);
    }

    #[test]
    fn mixed_sequence_keeps_ledger_and_row_in_sync() {
        let (service, products, product_id) = setup(0);

        let sequence = [
            (MovementType::In, 100),
            (MovementType::Out, 25),
            (MovementType::In, 10),
            (MovementType::Damage, 5),
            (MovementType::Out, 80),
        ];
        for (movement_type, quantity) in sequence {
            service
                .apply(request(product_id, movement_type, quantity))
                .unwrap();
        }

        let product = products.get(product_id).unwrap().unwrap();
        assert_eq!(product.total_in, 110);
        assert_eq!(product.total_out, 110);
        assert_eq!(product.quantity, 0);
        assert_eq!(
            product.quantity,
            product.total_in - product.total_out
        );

        let newest = service
            .list(&MovementFilter {
                product_id: Some(product_id),
                ..MovementFilter::default()
            })
            .unwrap();
        assert_eq!(newest.len(), sequence.len());
        assert_eq!(newest[0].movement.new_stock, product.quantity);
    }
}
