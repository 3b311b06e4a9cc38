#![no_std]
#![no_main]

use bsp::entry;
use defmt::*;
use defmt_rtt as _;
use panic_probe as _;

// Provide an alias for our BSP so we can switch targets quickly.
// Uncomment the BSP you included in Cargo.toml, the rest of the code does not need to change.
use rp_pico as bsp;

use bsp::hal::{
    clocks::{init_clocks_and_plls, Clock},
    pac,
    watchdog::Watchdog,
};
use landslide_alert::board::{PicoAdc, PicoBuzzer, RttTelemetry};
use landslide_alert::sensors::{RainSensor, SimulatedThermometer};
use landslide_alert::{Monitor, Preferences, StopButton};
use rp_pico::hal;
use rp_pico::hal::adc::AdcPin;
use rp_pico::hal::pwm::Slices;
use rp_pico::hal::{Adc, Timer};

#[entry]
fn main() -> ! {
    info!("Landslide monitor starting");
    // Grab our singleton objects
    let mut pac = pac::Peripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // Configure the clocks
    //
    // The default is to generate a 125 MHz system clock
    let clocks = init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // The single-cycle I/O block controls our GPIO pins
    let sio = hal::Sio::new(pac.SIO);

    // Set the pins up according to their function on this particular board
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    // Set up rain sensor
    let adc = Adc::new(pac.ADC, &mut pac.RESETS);
    let rain_analog = AdcPin::new(pins.gpio27.into_floating_input()).unwrap();
    let rain_detect = pins.gpio16.into_floating_input();
    let thermometer = SimulatedThermometer::new(move || timer.get_counter().ticks());
    let sensor = RainSensor::new(PicoAdc::new(adc, rain_analog), rain_detect, thermometer);

    // Set up buzzer
    let pwm_slices = Slices::new(pac.PWM, &mut pac.RESETS);
    let mut pwm = pwm_slices.pwm7;
    pwm.channel_b.output_to(pins.gpio15);
    let buzzer = PicoBuzzer::new(pwm, clocks.system_clock.freq().to_Hz());

    // Set up stop button
    let stop = StopButton::new(pins.gpio14.into_pull_down_input());

    let preferences = Preferences::default();
    info!("Landslide monitor ready: {}", preferences);

    let monitor = Monitor::new(preferences, sensor, buzzer, stop, timer, RttTelemetry);
    match monitor.run() {
        Ok(()) => info!("Landslide monitor stopped"),
        Err(err) => defmt::panic!("Landslide monitor failed: {}", Debug2Format(&err)),
    }

    // Nothing left to do; the buzzer is silent
    loop {
        cortex_m::asm::wfi();
    }
}
