//! The front of house as seen from the kitchen.
//!
//! Customers are owned by the host. The kitchen only reads which dishes are
//! wanted, asks whether the shop is open and hands dishes over through
//! [`FrontOfHouse`]. [`CustomerQueue`] is a small self-contained
//! implementation for headless hosts and tests.

use crate::id::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Waiting,
    /// Served; leaves satisfied after `remaining` more patience ticks.
    Eating { remaining: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub id: CustomerId,
    pub dish: ItemId,
    /// Patience ticks left before the customer walks out.
    pub patience: u32,
    pub status: CustomerStatus,
}

impl CustomerOrder {
    pub fn is_waiting(&self) -> bool {
        self.status == CustomerStatus::Waiting
    }
}

/// A customer leaving the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    Satisfied(CustomerOrder),
    OutOfPatience(CustomerOrder),
}

/// The kitchen's collaborator for orders and serving.
pub trait FrontOfHouse {
    fn is_shop_open(&self) -> bool;

    /// Current customers, indexable by the `customer` argument of
    /// [`serve_customer`](Self::serve_customer).
    fn orders(&self) -> &[CustomerOrder];

    /// Offer `dish` to the customer at `index`. `true` if accepted.
    fn serve_customer(&mut self, index: usize, dish: &ItemId) -> bool;

    /// One patience step. Hosts that run their own countdown keep the
    /// default.
    fn tick_patience(&mut self) -> Vec<Departure> {
        Vec::new()
    }
}

/// Bounded queue of customers with a patience countdown.
#[derive(Debug, Clone)]
pub struct CustomerQueue {
    customers: Vec<CustomerOrder>,
    open: bool,
    capacity: usize,
    meal_ticks: u32,
    next_id: u32,
}

impl Default for CustomerQueue {
    fn default() -> Self {
        Self::new(6, 3)
    }
}

impl CustomerQueue {
    /// An open shop seating at most `capacity` customers, each eating for
    /// `meal_ticks` patience ticks once served.
    pub fn new(capacity: usize, meal_ticks: u32) -> Self {
        Self {
            customers: Vec::new(),
            open: true,
            capacity,
            meal_ticks,
            next_id: 1,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Seat a new customer. `None` when the shop is closed or full.
    pub fn arrive(&mut self, dish: ItemId, patience: u32) -> Option<CustomerId> {
        if !self.open || self.customers.len() >= self.capacity {
            return None;
        }
        let id = CustomerId(self.next_id);
        self.next_id += 1;
        tracing::debug!(customer = %id, %dish, patience, "customer arrived");
        self.customers.push(CustomerOrder {
            id,
            dish,
            patience: patience.max(1),
            status: CustomerStatus::Waiting,
        });
        Some(id)
    }

    pub fn index_of(&self, id: CustomerId) -> Option<usize> {
        self.customers.iter().position(|c| c.id == id)
    }
}

impl FrontOfHouse for CustomerQueue {
    fn is_shop_open(&self) -> bool {
        self.open
    }

    fn orders(&self) -> &[CustomerOrder] {
        &self.customers
    }

    fn serve_customer(&mut self, index: usize, dish: &ItemId) -> bool {
        let meal_ticks = self.meal_ticks;
        match self.customers.get_mut(index) {
            Some(customer) if customer.is_waiting() && customer.dish == *dish => {
                customer.status = CustomerStatus::Eating {
                    remaining: meal_ticks,
                };
                true
            }
            _ => false,
        }
    }

    /// Waiting customers lose one patience point; eating customers get one
    /// tick closer to leaving.
    fn tick_patience(&mut self) -> Vec<Departure> {
        let mut departed = Vec::new();
        let mut kept = Vec::with_capacity(self.customers.len());
        for mut customer in self.customers.drain(..) {
            match customer.status {
                CustomerStatus::Waiting => {
                    customer.patience = customer.patience.saturating_sub(1);
                    if customer.patience == 0 {
                        departed.push(Departure::OutOfPatience(customer));
                        continue;
                    }
                }
                CustomerStatus::Eating { remaining } => {
                    let remaining = remaining.saturating_sub(1);
                    customer.status = CustomerStatus::Eating { remaining };
                    if remaining == 0 {
                        departed.push(Departure::Satisfied(customer));
                        continue;
                    }
                }
            }
            kept.push(customer);
        }
        self.customers = kept;
        departed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_bounded_and_gated() {
        let mut queue = CustomerQueue::new(2, 3);
        assert!(queue.arrive(ItemId::from("a"), 5).is_some());
        assert!(queue.arrive(ItemId::from("b"), 5).is_some());
        assert!(queue.arrive(ItemId::from("c"), 5).is_none());

        let mut closed = CustomerQueue::default();
        closed.close();
        assert!(!closed.is_shop_open());
        assert!(closed.arrive(ItemId::from("a"), 5).is_none());
    }

    #[test]
    fn serve_needs_matching_waiting_customer() {
        let mut queue = CustomerQueue::default();
        queue.arrive(ItemId::from("tomato_egg"), 5);
        assert!(!queue.serve_customer(0, &ItemId::from("garlic_vegetables")));
        assert!(!queue.serve_customer(3, &ItemId::from("tomato_egg")));
        assert!(queue.serve_customer(0, &ItemId::from("tomato_egg")));
        assert!(!queue.serve_customer(0, &ItemId::from("tomato_egg")));
    }

    #[test]
    fn impatient_customers_leave() {
        let mut queue = CustomerQueue::default();
        let id = queue.arrive(ItemId::from("tomato_egg"), 2).unwrap();
        assert!(queue.tick_patience().is_empty());
        assert_eq!(queue.orders()[0].patience, 1);
        let left = queue.tick_patience();
        assert!(matches!(&left[..], [Departure::OutOfPatience(c)] if c.id == id));
        assert!(queue.is_empty());
    }

    #[test]
    fn eating_customers_do_not_lose_patience() {
        let mut queue = CustomerQueue::new(6, 2);
        queue.arrive(ItemId::from("tomato_egg"), 1);
        queue.serve_customer(0, &ItemId::from("tomato_egg"));
        assert!(queue.tick_patience().is_empty());
        assert_eq!(queue.orders()[0].patience, 1);
        assert!(matches!(&queue.tick_patience()[..], [Departure::Satisfied(_)]));
    }
}
