//! Map and share links for coordinates.

use crate::Coordinate;

/// Link that opens the coordinate in the device's maps application.
///
/// ```
/// use myco_geo::{maps_url, Coordinate};
///
/// let url = maps_url(&Coordinate::new(45.764, 4.8357));
/// assert_eq!(url, "https://maps.google.com/?q=45.764,4.8357");
/// ```
pub fn maps_url(coord: &Coordinate) -> String {
    format!("https://maps.google.com/?q={},{}", coord.latitude, coord.longitude)
}

/// Link embedded in position-sharing messages.
pub fn share_url(coord: &Coordinate) -> String {
    format!("https://www.google.com/maps?q={},{}", coord.latitude, coord.longitude)
}

/// Text shared with contacts when the user sends their position.
pub fn share_message(coord: &Coordinate) -> String {
    format!(
        "SOS - Je partage ma position avec vous!\n\nCoordonnées: {}\n\nOuvrir dans Google Maps: {}",
        coord.display(6),
        share_url(coord)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_url_negative_coordinates() {
        let url = maps_url(&Coordinate::new(-33.8688, -151.2093));
        assert_eq!(url, "https://maps.google.com/?q=-33.8688,-151.2093");
    }

    #[test]
    fn test_share_url() {
        let url = share_url(&Coordinate::new(48.8566, 2.3522));
        assert_eq!(url, "https://www.google.com/maps?q=48.8566,2.3522");
    }

    #[test]
    fn test_share_message_contains_link_and_coordinates() {
        let msg = share_message(&Coordinate::new(48.8566, 2.3522));
        assert!(msg.contains("48.856600, 2.352200"));
        assert!(msg.contains("https://www.google.com/maps?q=48.8566,2.3522"));
    }
}
