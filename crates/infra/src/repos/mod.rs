pub mod courses;
pub mod customers;
pub mod opening_hours;
pub mod organizations;
pub mod reservations;
pub mod restaurants;
pub mod reviews;

pub use courses::CreateCourse;
pub use customers::NewCustomer;
pub use opening_hours::UpsertOpeningHour;
pub use reservations::{AdmitError, NewReservation, ReservationFilter, ReservationStatus};
pub use restaurants::{CreateRestaurant, RestaurantSearch, RestaurantSort, SortDirection};
pub use reviews::CreateReview;
