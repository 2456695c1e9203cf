#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::Delay;
use keytx::{DEFAULT_KEYMAP, Keypad, KeypadConfig, LedBank, Matrix, SoftUartTx};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Keypad start!");
    let p = embassy_rp::init(Default::default());
    let config: KeypadConfig = KeypadConfig::default();

    // Rows idle high, columns pulled up
    let output_pins = [
        Output::new(p.PIN_0, Level::High),
        Output::new(p.PIN_1, Level::High),
        Output::new(p.PIN_2, Level::High),
        Output::new(p.PIN_3, Level::High),
        Output::new(p.PIN_4, Level::High),
    ];
    let input_pins = [
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
        Input::new(p.PIN_9, Pull::Up),
    ];
    // LEDs are lit when driven low
    let led_pins = [
        Output::new(p.PIN_10, Level::High),
        Output::new(p.PIN_11, Level::High),
        Output::new(p.PIN_12, Level::High),
        Output::new(p.PIN_13, Level::High),
    ];
    // Serial line idles high
    let tx_pin = Output::new(p.PIN_16, Level::High);

    let matrix = Matrix::new(input_pins, output_pins, Delay, config.matrix, &config.timing);
    let leds = LedBank::new(led_pins, config.light.low_active);
    let tx = SoftUartTx::new(tx_pin, Delay, config.serial);
    let mut keypad = Keypad::new(matrix, leds, tx, Delay, DEFAULT_KEYMAP, config);

    keypad.run()
}
