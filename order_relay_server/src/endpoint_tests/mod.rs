mod helpers;
mod relay_control;
