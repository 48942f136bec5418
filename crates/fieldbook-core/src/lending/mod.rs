pub mod calendar;
pub mod comparison;
pub mod payoff;
pub mod sweep;
