//! Record fixtures shared by the unit tests.
use crate::shape::{Field, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: Option<String>,
    pub street: Option<String>,
}

impl Address {
    pub fn new(city: &str, street: &str) -> Self {
        Self {
            city: Some(city.to_string()),
            street: Some(street.to_string()),
        }
    }
}

// No `construct`: an address only ever exists fully populated.
impl Shape for Address {
    fn fields() -> Vec<Field> {
        vec![
            Field::new(
                "city",
                |a: &Address| a.city.as_ref(),
                |a: &mut Address, v| a.city = Some(v),
            ),
            Field::new(
                "street",
                |a: &Address| a.street.as_ref(),
                |a: &mut Address, v| a.street = Some(v),
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub address: Option<Address>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Person {
    pub fn michal() -> Self {
        Self {
            name: "Michal".into(),
            age: 15,
            address: Some(Address::new("Warsaw", "Nowy Swiat")),
            email: None,
            phone: None,
        }
    }

    pub fn with_contact(email: &str, phone: &str) -> Self {
        Self {
            email: Some(email.into()),
            phone: Some(phone.into()),
            ..Self::michal()
        }
    }
}

impl Shape for Person {
    fn fields() -> Vec<Field> {
        vec![
            Field::new("name", |p: &Person| Some(&p.name), |p: &mut Person, v| p.name = v),
            Field::new("age", |p: &Person| Some(&p.age), |p: &mut Person, v| p.age = v),
            Field::nested(
                "address",
                |p: &Person| p.address.as_ref(),
                |p: &mut Person| &mut p.address,
            ),
            Field::new(
                "email",
                |p: &Person| p.email.as_ref(),
                |p: &mut Person, v| p.email = Some(v),
            ),
            Field::new(
                "phone",
                |p: &Person| p.phone.as_ref(),
                |p: &mut Person, v| p.phone = Some(v),
            ),
            Field::read_only("display_name", |p: &Person| Some(&p.name)),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Shape for Contact {
    fn fields() -> Vec<Field> {
        vec![
            Field::new(
                "email",
                |c: &Contact| c.email.as_ref(),
                |c: &mut Contact, v| c.email = Some(v),
            ),
            Field::new(
                "phone",
                |c: &Contact| c.phone.as_ref(),
                |c: &mut Contact, v| c.phone = Some(v),
            ),
        ]
    }

    fn construct() -> Option<Self> {
        Some(Self::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonDto {
    pub first_name: Option<String>,
    pub age: u32,
    pub city: Option<String>,
    pub street: Option<String>,
    pub contact: Option<Contact>,
}

impl Shape for PersonDto {
    fn fields() -> Vec<Field> {
        vec![
            Field::new(
                "first_name",
                |d: &PersonDto| d.first_name.as_ref(),
                |d: &mut PersonDto, v| d.first_name = Some(v),
            ),
            Field::new("age", |d: &PersonDto| Some(&d.age), |d: &mut PersonDto, v| d.age = v),
            Field::new(
                "city",
                |d: &PersonDto| d.city.as_ref(),
                |d: &mut PersonDto, v| d.city = Some(v),
            ),
            Field::new(
                "street",
                |d: &PersonDto| d.street.as_ref(),
                |d: &mut PersonDto, v| d.street = Some(v),
            ),
            Field::nested(
                "contact",
                |d: &PersonDto| d.contact.as_ref(),
                |d: &mut PersonDto| &mut d.contact,
            ),
        ]
    }

    fn construct() -> Option<Self> {
        Some(Self::default())
    }
}

/// A destination without a no-argument constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonSummary {
    pub id: u64,
    pub name: Option<String>,
    pub age: u32,
}

impl PersonSummary {
    pub fn with_id(id: u64) -> Self {
        Self { id, name: None, age: 0 }
    }
}

impl Shape for PersonSummary {
    fn fields() -> Vec<Field> {
        vec![
            Field::read_only("id", |s: &PersonSummary| Some(&s.id)),
            Field::new(
                "name",
                |s: &PersonSummary| s.name.as_ref(),
                |s: &mut PersonSummary, v| s.name = Some(v),
            ),
            Field::new(
                "age",
                |s: &PersonSummary| Some(&s.age),
                |s: &mut PersonSummary, v| s.age = v,
            ),
        ]
    }
}

/// A destination whose names follow a different casing than `Person`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyPersonRow {
    pub full_name: Option<String>,
    pub age: Option<u32>,
    pub e_mail: Option<String>,
}

impl Shape for LegacyPersonRow {
    fn fields() -> Vec<Field> {
        vec![
            Field::new(
                "fullName",
                |r: &LegacyPersonRow| r.full_name.as_ref(),
                |r: &mut LegacyPersonRow, v| r.full_name = Some(v),
            ),
            Field::new(
                "AGE",
                |r: &LegacyPersonRow| r.age.as_ref(),
                |r: &mut LegacyPersonRow, v| r.age = Some(v),
            ),
            Field::new(
                "E_mail",
                |r: &LegacyPersonRow| r.e_mail.as_ref(),
                |r: &mut LegacyPersonRow, v| r.e_mail = Some(v),
            ),
        ]
    }

    fn construct() -> Option<Self> {
        Some(Self::default())
    }
}
