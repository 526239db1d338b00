//! Basic output executor with timers and interlocks.

use std::time::{Duration, Instant};

use stateio_app::event_bus::EventQueue;
use stateio_app::ports::{OutputExecutor, SwitchCommand};
use stateio_domain::addressing::PinAddress;
use stateio_domain::channel::{OutputConfig, OutputType};
use stateio_domain::device::{DEVICE_COUNT, DeviceId, PINS_PER_DEVICE};
use stateio_domain::event::{OutputLevel, OutputPinEvent, PinEvent};

type DeviceOutputs = [OutputConfig; PINS_PER_DEVICE as usize];

/// Switches outputs immediately.
///
/// Turning an output on first turns its interlock partner off. Timer outputs
/// turn themselves off once their on-time has elapsed.
#[derive(Debug, Clone, Default)]
pub struct BasicOutputExecutor {
    on: [u16; DEVICE_COUNT as usize],
    deadlines: [[Option<Instant>; PINS_PER_DEVICE as usize]; DEVICE_COUNT as usize],
}

impl BasicOutputExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the executor last drove `address` on.
    #[must_use]
    pub fn is_on(&self, address: PinAddress) -> bool {
        self.on[address.device.as_usize()] & (1 << address.pin) != 0
    }

    /// [`OutputExecutor::handle_command`] with an explicit clock.
    pub fn handle_command_at(
        &mut self,
        now: Instant,
        address: PinAddress,
        command: SwitchCommand,
        configs: &DeviceOutputs,
        events: &mut EventQueue,
    ) {
        let config = configs[usize::from(address.pin)];
        match command {
            SwitchCommand::On => {
                if let Some(partner) = config
                    .interlock_partner(address.pin)
                    .and_then(|pin| PinAddress::new(address.device, pin))
                    && self.is_on(partner)
                {
                    self.switch(partner, configs, OutputLevel::Off, events);
                }
                self.switch(address, configs, OutputLevel::On, events);
                if config.output_type == OutputType::Timer {
                    let on_time = Duration::from_secs(u64::from(config.timer.get()));
                    self.deadlines[address.device.as_usize()][usize::from(address.pin)] =
                        Some(now + on_time);
                }
            }
            SwitchCommand::Off => self.switch(address, configs, OutputLevel::Off, events),
        }
    }

    /// [`OutputExecutor::process`] with an explicit clock.
    pub fn process_at(
        &mut self,
        now: Instant,
        device: DeviceId,
        configs: &DeviceOutputs,
        events: &mut EventQueue,
    ) {
        for pin in 0..PINS_PER_DEVICE {
            let expired = self.deadlines[device.as_usize()][usize::from(pin)]
                .is_some_and(|deadline| deadline <= now);
            if let (true, Some(address)) = (expired, PinAddress::new(device, pin)) {
                tracing::debug!(%address, "timer expired");
                self.switch(address, configs, OutputLevel::Off, events);
            }
        }
    }

    fn switch(
        &mut self,
        address: PinAddress,
        configs: &DeviceOutputs,
        level: OutputLevel,
        events: &mut EventQueue,
    ) {
        let on = &mut self.on[address.device.as_usize()];
        if level.is_on() {
            *on |= 1 << address.pin;
        } else {
            *on &= !(1 << address.pin);
            self.deadlines[address.device.as_usize()][usize::from(address.pin)] = None;
        }
        events.push(PinEvent::Output(OutputPinEvent {
            address,
            output_type: configs[usize::from(address.pin)].output_type,
            level,
        }));
    }
}

impl OutputExecutor for BasicOutputExecutor {
    fn handle_command(
        &mut self,
        address: PinAddress,
        command: SwitchCommand,
        configs: &DeviceOutputs,
        events: &mut EventQueue,
    ) {
        self.handle_command_at(Instant::now(), address, command, configs, events);
    }

    fn process(&mut self, device: DeviceId, configs: &DeviceOutputs, events: &mut EventQueue) {
        self.process_at(Instant::now(), device, configs, events);
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn device() -> DeviceId {
        DeviceId::new(4).unwrap()
    }

    fn address(pin: u8) -> PinAddress {
        PinAddress::new(device(), pin).unwrap()
    }

    fn configs() -> DeviceOutputs {
        std::array::from_fn(|pin| OutputConfig::new(u8::try_from(pin).unwrap()))
    }

    fn outputs(queue: &mut EventQueue) -> Vec<(u8, OutputLevel)> {
        queue
            .drain()
            .map(|event| match event {
                PinEvent::Output(output) => (output.address.pin, output.level),
                PinEvent::Input(_) => panic!("executor raised an input event"),
            })
            .collect()
    }

    #[test]
    fn should_switch_relay_on_and_off() {
        let mut executor = BasicOutputExecutor::new();
        let configs = configs();
        let mut queue = EventQueue::new();
        executor.handle_command(address(0), SwitchCommand::On, &configs, &mut queue);
        assert!(executor.is_on(address(0)));
        executor.handle_command(address(0), SwitchCommand::Off, &configs, &mut queue);
        assert!(!executor.is_on(address(0)));
        assert_eq!(
            outputs(&mut queue),
            vec![(0, OutputLevel::On), (0, OutputLevel::Off)]
        );
    }

    #[test]
    fn should_turn_interlock_partner_off_first() {
        let mut executor = BasicOutputExecutor::new();
        let mut configs = configs();
        configs[0].interlock = 1;
        configs[1].interlock = 0;
        let mut queue = EventQueue::new();
        executor.handle_command(address(1), SwitchCommand::On, &configs, &mut queue);
        executor.handle_command(address(0), SwitchCommand::On, &configs, &mut queue);
        assert_eq!(
            outputs(&mut queue),
            vec![(1, OutputLevel::On), (1, OutputLevel::Off), (0, OutputLevel::On)]
        );
        assert!(!executor.is_on(address(1)));
    }

    #[test]
    fn should_expire_timer_outputs() {
        let mut executor = BasicOutputExecutor::new();
        let mut configs = configs();
        configs[2].output_type = OutputType::Timer;
        configs[2].timer = NonZeroU32::new(5).unwrap();
        let start = Instant::now();
        let mut queue = EventQueue::new();

        executor.handle_command_at(start, address(2), SwitchCommand::On, &configs, &mut queue);
        executor.process_at(start + Duration::from_secs(4), device(), &configs, &mut queue);
        assert_eq!(outputs(&mut queue), vec![(2, OutputLevel::On)]);

        executor.process_at(start + Duration::from_secs(5), device(), &configs, &mut queue);
        assert_eq!(outputs(&mut queue), vec![(2, OutputLevel::Off)]);

        executor.process_at(start + Duration::from_secs(6), device(), &configs, &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn should_cancel_timer_when_switched_off() {
        let mut executor = BasicOutputExecutor::new();
        let mut configs = configs();
        configs[3].output_type = OutputType::Timer;
        let start = Instant::now();
        let mut queue = EventQueue::new();

        executor.handle_command_at(start, address(3), SwitchCommand::On, &configs, &mut queue);
        executor.handle_command_at(start, address(3), SwitchCommand::Off, &configs, &mut queue);
        outputs(&mut queue);

        executor.process_at(start + Duration::from_secs(120), device(), &configs, &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn should_not_start_timer_for_relay() {
        let mut executor = BasicOutputExecutor::new();
        let configs = configs();
        let start = Instant::now();
        let mut queue = EventQueue::new();
        executor.handle_command_at(start, address(0), SwitchCommand::On, &configs, &mut queue);
        outputs(&mut queue);
        executor.process_at(start + Duration::from_secs(3600), device(), &configs, &mut queue);
        assert!(queue.is_empty());
        assert!(executor.is_on(address(0)));
    }
}
