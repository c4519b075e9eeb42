// MyLibrary - Personal Book Tracking Service
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Book lifecycle rules
//!
//! The [`service::LibraryService`] is the single entry point for adding,
//! listing, finding, updating, and deleting books. The optional
//! [`throttle::RateLimiter`] policy can be injected per service instance.

pub mod service;
pub mod throttle;

pub use service::LibraryService;
pub use throttle::RateLimiter;
