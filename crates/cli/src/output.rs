//! Plain-text rendering for command results.
//!
//! Results go to stdout; logs go to stderr through `tracing`.

#![allow(clippy::print_stdout)]

use shopfront_admin::{AdminOrder, AdminUser, DashboardStats};
use shopfront_core::Money;
use shopfront_storefront::api::{CatalogItem, Category};
use shopfront_storefront::cart::ReconciledCart;
use shopfront_storefront::checkout::OrderSummary;
use shopfront_storefront::orders::OrderRecord;
use shopfront_storefront::wishlist::WishlistEntry;

pub fn products<'a>(items: impl IntoIterator<Item = &'a CatalogItem>) {
    let mut count = 0;
    for item in items {
        count += 1;
        let stock = if item.available { "" } else { "  [out of stock]" };
        println!(
            "{:>6}  {:<40}  {:>12}  {}{stock}",
            item.id,
            item.name,
            item.unit_price().to_string(),
            item.category.as_deref().unwrap_or("-"),
        );
    }
    if count == 0 {
        println!("No products found.");
    }
}

pub fn product(item: &CatalogItem) {
    println!("{} (#{})", item.name, item.id);
    if let Some(brand) = &item.brand {
        println!("  Brand:     {brand}");
    }
    println!("  Price:     {}", item.unit_price());
    if let Some(category) = &item.category {
        println!("  Category:  {category}");
    }
    match item.stock_quantity {
        Some(stock) if item.available => println!("  Stock:     {stock} available"),
        _ if item.available => println!("  Stock:     available"),
        _ => println!("  Stock:     out of stock"),
    }
    if let Some(date) = &item.release_date {
        println!("  Released:  {date}");
    }
    if let Some(description) = &item.description {
        println!();
        println!("{description}");
    }
}

pub fn names<'a>(names: impl IntoIterator<Item = &'a str>) {
    for name in names {
        println!("{name}");
    }
}

pub fn categories(categories: &[Category]) {
    for c in categories {
        let state = if c.active { "active" } else { "inactive" };
        println!("{:>6}  {:<30}  {state}", c.id, c.name);
    }
}

pub fn cart(cart: &ReconciledCart, summary: &OrderSummary) {
    if cart.is_empty() && cart.dangling.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in &cart.lines {
        let note = if line.available { "" } else { "  [unavailable]" };
        println!(
            "{:>6}  {:<40}  {:>4} x {:>10}  = {:>12}{note}",
            line.item_id,
            line.name,
            line.quantity,
            line.unit_price.to_string(),
            line.line_total.to_string(),
        );
    }
    for line in &cart.dangling {
        println!(
            "{:>6}  {:<40}  {:>4}    no longer in the catalog (remove with `cart remove {}`)",
            line.item_id, line.name, line.quantity, line.item_id
        );
    }
    if !cart.is_empty() {
        println!();
        summary_lines(summary);
    }
}

pub fn summary_lines(summary: &OrderSummary) {
    println!("  Subtotal:  {:>12}", summary.subtotal.to_string());
    println!("  Tax:       {:>12}", summary.tax.to_string());
    let shipping = if summary.free_shipping() {
        "FREE".to_string()
    } else {
        summary.shipping.to_string()
    };
    println!("  Shipping:  {shipping:>12}");
    println!("  Total:     {:>12}", summary.total.to_string());
}

pub fn wishlist(entries: &[WishlistEntry]) {
    if entries.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }
    products(entries.iter().map(|e| &e.item));
}

pub fn order(record: &OrderRecord) {
    println!(
        "{}  {}  {:<10}  {:>12}  ({} item(s))",
        record.order_number,
        record.placed_at.format("%Y-%m-%d %H:%M"),
        record.status.to_string(),
        record.charged_total.to_string(),
        record.items.len(),
    );
}

pub fn orders<'a>(records: impl IntoIterator<Item = &'a OrderRecord>) {
    let mut count = 0;
    for record in records {
        count += 1;
        order(record);
    }
    if count == 0 {
        println!("No orders found.");
    }
}

pub fn admin_orders(orders: &[AdminOrder]) {
    if orders.is_empty() {
        println!("No orders found.");
    }
    for o in orders {
        println!(
            "{:>6}  {}  {:<10}  {:>12}  {}",
            o.order.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            o.order.order_number,
            o.order.status.to_string(),
            Money::new(o.order.total).to_string(),
            o.customer_name.as_deref().unwrap_or("-"),
        );
    }
}

pub fn admin_order(o: &AdminOrder) {
    admin_orders(std::slice::from_ref(o));
    for item in &o.order.items {
        println!(
            "        {:<40}  x{}",
            item.product_name.as_deref().unwrap_or("(product)"),
            item.quantity
        );
    }
    if let Some(address) = &o.shipping_address {
        println!(
            "        Ship to: {address}, {} {}",
            o.city.as_deref().unwrap_or(""),
            o.pincode.as_deref().unwrap_or("")
        );
    }
}

pub fn users(users: &[AdminUser]) {
    for u in users {
        let name = match (u.first_name.as_deref(), u.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => String::new(),
        };
        let blocked = if u.blocked { "  [blocked]" } else { "" };
        println!("{:>6}  {:<30}  {:<24}  {}{blocked}", u.id, u.email, name, u.role);
    }
}

pub fn dashboard(stats: &DashboardStats) {
    println!("Products:    {}", stats.total_products);
    println!("Categories:  {}", stats.total_categories);
    println!("Users:       {}", stats.total_users);
    println!(
        "Orders:      {} ({} pending, {} shipped, {} delivered)",
        stats.total_orders, stats.pending_orders, stats.shipped_orders, stats.delivered_orders
    );
    let revenue = stats.total_revenue.map(Money::new).unwrap_or_default();
    println!("Revenue:     {revenue}");
}

pub fn message(text: &str) {
    println!("{text}");
}
