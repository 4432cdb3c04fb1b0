//! Word lists for product fixtures.

pub(crate) const ADJECTIVES: &[&str] = &[
    "Small",
    "Ergonomic",
    "Rustic",
    "Intelligent",
    "Gorgeous",
    "Incredible",
    "Fantastic",
    "Practical",
    "Sleek",
    "Awesome",
    "Enormous",
    "Mediocre",
    "Synergistic",
    "Heavy Duty",
    "Lightweight",
    "Aerodynamic",
    "Durable",
];

pub(crate) const MATERIALS: &[&str] = &[
    "Steel",
    "Wooden",
    "Concrete",
    "Plastic",
    "Cotton",
    "Granite",
    "Rubber",
    "Leather",
    "Silk",
    "Wool",
    "Linen",
    "Marble",
    "Iron",
    "Bronze",
    "Copper",
    "Aluminum",
    "Paper",
];

pub(crate) const PRODUCTS: &[&str] = &[
    "Chair", "Car", "Computer", "Gloves", "Pants", "Shirt", "Table", "Shoes", "Hat", "Plate",
    "Knife", "Bottle", "Coat", "Lamp", "Keyboard", "Bag", "Bench", "Clock", "Watch", "Wallet",
];

pub(crate) const DEPARTMENTS: &[&str] = &[
    "Books",
    "Movies",
    "Music",
    "Games",
    "Electronics",
    "Computers",
    "Home",
    "Garden",
    "Tools",
    "Grocery",
    "Health",
    "Beauty",
    "Toys",
    "Kids",
    "Baby",
    "Clothing",
    "Shoes",
    "Jewelery",
    "Sports",
    "Outdoors",
    "Automotive",
    "Industrial",
];
