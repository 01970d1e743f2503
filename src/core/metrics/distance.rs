use geo::{Distance, Geodesic, Point};

fn valid_coordinate(longitude: f64, latitude: f64) -> bool {
    longitude.is_finite()
        && latitude.is_finite()
        && (-180.0..=180.0).contains(&longitude)
        && (-90.0..=90.0).contains(&latitude)
}

/// WGS84 橢球上的測地線距離（公里）；任一座標不合法時回傳 `None`
pub fn geodesic_distance_km(
    (true_longitude, true_latitude): (f64, f64),
    (pred_longitude, pred_latitude): (f64, f64),
) -> Option<f64> {
    if !valid_coordinate(true_longitude, true_latitude)
        || !valid_coordinate(pred_longitude, pred_latitude)
    {
        return None;
    }

    let meters = Geodesic::distance(
        Point::new(true_longitude, true_latitude),
        Point::new(pred_longitude, pred_latitude),
    );
    Some(meters / 1000.0)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
