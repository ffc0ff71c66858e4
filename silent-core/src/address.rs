//! Display address synthesis from `addr:*` tags.

use crate::element::{Tags, non_blank};

/// Street name tag.
pub const STREET_TAG: &str = "addr:street";
/// House number tag.
pub const HOUSE_NUMBER_TAG: &str = "addr:housenumber";
/// City tag.
pub const CITY_TAG: &str = "addr:city";
/// Placeholder used when no address tags are present.
pub const UNKNOWN_ADDRESS: &str = "Adres onbekend";

/// Build a display address.
///
/// Street and house number are joined with a space and then combined with
/// the city through `", "`. Either half is used alone when the other is
/// missing. Without any address tags the result is [`UNKNOWN_ADDRESS`], so
/// the output is never empty.
///
/// # Examples
/// ```
/// use silent_core::{Tags, UNKNOWN_ADDRESS, synthesise_address};
///
/// let tags = Tags::from([
///     ("addr:street".to_owned(), "Kerkstraat".to_owned()),
///     ("addr:housenumber".to_owned(), "12".to_owned()),
///     ("addr:city".to_owned(), "Utrecht".to_owned()),
/// ]);
/// assert_eq!(synthesise_address(&tags), "Kerkstraat 12, Utrecht");
/// assert_eq!(synthesise_address(&Tags::new()), UNKNOWN_ADDRESS);
/// ```
#[must_use]
pub fn synthesise_address(tags: &Tags) -> String {
    let street_line = match (non_blank(tags, STREET_TAG), non_blank(tags, HOUSE_NUMBER_TAG)) {
        (Some(street), Some(number)) => Some(format!("{street} {number}")),
        (Some(street), None) => Some(street.to_owned()),
        (None, Some(number)) => Some(number.to_owned()),
        (None, None) => None,
    };
    match (street_line, non_blank(tags, CITY_TAG)) {
        (Some(line), Some(city)) => format!("{line}, {city}"),
        (Some(line), None) => line,
        (None, Some(city)) => city.to_owned(),
        (None, None) => UNKNOWN_ADDRESS.to_owned(),
    }
}
