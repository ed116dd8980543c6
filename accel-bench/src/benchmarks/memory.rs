//! Memory transfer benchmarks: contiguous copies, pattern fills, and 3D
//! region copies, all reported as throughput.

use std::any::Any;
use std::hint::black_box;

use accel_harness::argument::{
    ArgEnum, Argument, BoolArgument, ByteSizeArgument, CommonArguments, EnumArgument,
    IntegerArgument, NonNegativeIntegerArgument, ThreeComponentUintArgument,
};
use accel_harness::statistics::{Classification, MeasurementContext, MeasurementUnit};
use accel_harness::{Api, ArgumentContainer, Registry, RegistryError, Statistics, TestResult, Timer};

use crate::data_gen::DataGenerator;

use super::{noop_declare, push_sample_with_bytes};

const GROUP: &str = "memory";
const DATA_SEED: u64 = 42;

fn throughput() -> Classification {
    Classification::new(
        MeasurementUnit::GigabytesPerSecond,
        MeasurementContext::Host,
    )
}

/// Initial contents of the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferContents {
    Zeros,
    Random,
}

impl ArgEnum for BufferContents {
    const VALUES: &'static [BufferContents] = &[BufferContents::Zeros, BufferContents::Random];

    fn name(self) -> &'static str {
        match self {
            BufferContents::Zeros => "Zeros",
            BufferContents::Random => "Random",
        }
    }
}

fn make_buffer(size: usize, contents: BufferContents) -> Vec<u8> {
    match contents {
        BufferContents::Zeros => vec![0u8; size],
        BufferContents::Random => DataGenerator::new(DATA_SEED).bytes(size),
    }
}

pub struct BufferCopyArguments {
    pub common: CommonArguments,
    pub size: ByteSizeArgument,
    pub contents: EnumArgument<BufferContents>,
    pub verify: BoolArgument,
}

impl BufferCopyArguments {
    pub fn new() -> Self {
        Self {
            common: CommonArguments::new(),
            size: ByteSizeArgument::new("size", "Size of the copied buffer", 16 * 1024 * 1024),
            contents: EnumArgument::new(
                "contents",
                "Initial contents of the source buffer",
                BufferContents::Random,
            ),
            verify: BoolArgument::new("verify", "Check the destination after measuring", true),
        }
    }
}

impl ArgumentContainer for BufferCopyArguments {
    fn common(&self) -> &CommonArguments {
        &self.common
    }

    fn arguments(&self) -> Vec<&dyn Argument> {
        let mut args = self.common.arguments();
        args.push(&self.size);
        args.push(&self.contents);
        args.push(&self.verify);
        args
    }

    fn arguments_mut(&mut self) -> Vec<&mut dyn Argument> {
        let mut args = self.common.arguments_mut();
        args.push(&mut self.size);
        args.push(&mut self.contents);
        args.push(&mut self.verify);
        args
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn run_buffer_copy(arguments: &BufferCopyArguments, statistics: &mut Statistics) -> TestResult {
    let selector = throughput();
    if statistics.is_noop() {
        return noop_declare(statistics, selector);
    }

    let size = arguments.size.get() as usize;
    if size == 0 {
        return TestResult::InvalidArgs;
    }

    let source = make_buffer(size, arguments.contents.get());
    let mut destination = vec![0u8; size];
    let mut timer = Timer::new();

    // Warmup
    destination.copy_from_slice(&source);

    for _ in 0..arguments.common.iterations.get() {
        timer.start();
        destination.copy_from_slice(&source);
        black_box(&destination);
        timer.stop();
        if let Err(result) =
            push_sample_with_bytes(statistics, timer.elapsed(), size as u64, selector)
        {
            return result;
        }
    }

    if arguments.verify.get() && destination != source {
        return TestResult::VerificationFail;
    }
    TestResult::Success
}

pub struct BufferFillArguments {
    pub common: CommonArguments,
    pub size: ByteSizeArgument,
    pub pattern: IntegerArgument,
}

impl BufferFillArguments {
    pub fn new() -> Self {
        Self {
            common: CommonArguments::new(),
            size: ByteSizeArgument::new("size", "Size of the filled buffer", 16 * 1024 * 1024),
            pattern: IntegerArgument::new("pattern", "Byte value written to the buffer (0-255)", 0),
        }
    }
}

impl ArgumentContainer for BufferFillArguments {
    fn common(&self) -> &CommonArguments {
        &self.common
    }

    fn arguments(&self) -> Vec<&dyn Argument> {
        let mut args = self.common.arguments();
        args.push(&self.size);
        args.push(&self.pattern);
        args
    }

    fn arguments_mut(&mut self) -> Vec<&mut dyn Argument> {
        let mut args = self.common.arguments_mut();
        args.push(&mut self.size);
        args.push(&mut self.pattern);
        args
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn run_buffer_fill(arguments: &BufferFillArguments, statistics: &mut Statistics) -> TestResult {
    let selector = throughput();
    if statistics.is_noop() {
        return noop_declare(statistics, selector);
    }

    let size = arguments.size.get() as usize;
    let pattern = arguments.pattern.get();
    if size == 0 || !(0..=255).contains(&pattern) {
        return TestResult::InvalidArgs;
    }
    let pattern = pattern as u8;

    let mut destination = vec![0u8; size];
    let mut timer = Timer::new();

    // Warmup
    destination.fill(pattern);

    for _ in 0..arguments.common.iterations.get() {
        timer.start();
        destination.fill(pattern);
        black_box(&destination);
        timer.stop();
        if let Err(result) =
            push_sample_with_bytes(statistics, timer.elapsed(), size as u64, selector)
        {
            return result;
        }
    }

    if destination.iter().any(|&byte| byte != pattern) {
        return TestResult::VerificationFail;
    }
    TestResult::Success
}

pub struct RegionCopyArguments {
    pub common: CommonArguments,
    pub region: ThreeComponentUintArgument,
    pub origin: ThreeComponentUintArgument,
    pub row_pitch: NonNegativeIntegerArgument,
    pub slice_pitch: NonNegativeIntegerArgument,
}

impl RegionCopyArguments {
    pub fn new() -> Self {
        Self {
            common: CommonArguments::new(),
            region: ThreeComponentUintArgument::new(
                "region",
                "Copied region in bytes,rows,slices",
                [128, 128, 1],
            ),
            origin: ThreeComponentUintArgument::new(
                "origin",
                "Region origin in bytes,rows,slices",
                [0, 0, 0],
            ),
            row_pitch: NonNegativeIntegerArgument::new(
                "rPitch",
                "Bytes per buffer row; 0 packs rows tightly",
                0,
            ),
            slice_pitch: NonNegativeIntegerArgument::new(
                "sPitch",
                "Bytes per buffer slice; 0 packs slices tightly",
                0,
            ),
        }
    }
}

impl ArgumentContainer for RegionCopyArguments {
    fn common(&self) -> &CommonArguments {
        &self.common
    }

    fn arguments(&self) -> Vec<&dyn Argument> {
        let mut args = self.common.arguments();
        args.push(&self.region);
        args.push(&self.origin);
        args.push(&self.row_pitch);
        args.push(&self.slice_pitch);
        args
    }

    fn arguments_mut(&mut self) -> Vec<&mut dyn Argument> {
        let mut args = self.common.arguments_mut();
        args.push(&mut self.region);
        args.push(&mut self.origin);
        args.push(&mut self.row_pitch);
        args.push(&mut self.slice_pitch);
        args
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct RegionLayout {
    region: [usize; 3],
    origin: [usize; 3],
    row_pitch: usize,
    slice_pitch: usize,
    buffer_size: usize,
}

impl RegionLayout {
    fn from_arguments(arguments: &RegionCopyArguments) -> Option<RegionLayout> {
        let region = arguments.region.get().map(|v| v as usize);
        let origin = arguments.origin.get().map(|v| v as usize);
        if region.contains(&0) {
            return None;
        }

        let tight_row = origin[0] + region[0];
        let row_pitch = match arguments.row_pitch.get() as usize {
            0 => tight_row,
            pitch if pitch >= tight_row => pitch,
            _ => return None,
        };
        let tight_slice = row_pitch * (origin[1] + region[1]);
        let slice_pitch = match arguments.slice_pitch.get() as usize {
            0 => tight_slice,
            pitch if pitch >= tight_slice => pitch,
            _ => return None,
        };

        Some(RegionLayout {
            region,
            origin,
            row_pitch,
            slice_pitch,
            buffer_size: slice_pitch * (origin[2] + region[2]),
        })
    }

    fn row_offset(&self, y: usize, z: usize) -> usize {
        (self.origin[2] + z) * self.slice_pitch + (self.origin[1] + y) * self.row_pitch
            + self.origin[0]
    }

    fn bytes_copied(&self) -> u64 {
        (self.region[0] * self.region[1] * self.region[2]) as u64
    }
}

fn copy_region(layout: &RegionLayout, source: &[u8], destination: &mut [u8]) {
    for z in 0..layout.region[2] {
        for y in 0..layout.region[1] {
            let offset = layout.row_offset(y, z);
            destination[offset..offset + layout.region[0]]
                .copy_from_slice(&source[offset..offset + layout.region[0]]);
        }
    }
}

fn run_region_copy(arguments: &RegionCopyArguments, statistics: &mut Statistics) -> TestResult {
    let selector = throughput();
    if statistics.is_noop() {
        return noop_declare(statistics, selector);
    }

    let Some(layout) = RegionLayout::from_arguments(arguments) else {
        return TestResult::InvalidArgs;
    };

    let source = DataGenerator::new(DATA_SEED).bytes(layout.buffer_size);
    let mut destination = vec![0u8; layout.buffer_size];
    let mut timer = Timer::new();

    // Warmup
    copy_region(&layout, &source, &mut destination);

    for _ in 0..arguments.common.iterations.get() {
        timer.start();
        copy_region(&layout, &source, &mut destination);
        black_box(&destination);
        timer.stop();
        if let Err(result) =
            push_sample_with_bytes(statistics, timer.elapsed(), layout.bytes_copied(), selector)
        {
            return result;
        }
    }

    for z in 0..layout.region[2] {
        for y in 0..layout.region[1] {
            let offset = layout.row_offset(y, z);
            if destination[offset..offset + layout.region[0]]
                != source[offset..offset + layout.region[0]]
            {
                return TestResult::VerificationFail;
            }
        }
    }
    TestResult::Success
}

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        "BufferCopy",
        GROUP,
        "measures bandwidth of a contiguous copy between two host-visible buffers",
        || Box::new(BufferCopyArguments::new()),
    )?;
    registry.register_implementation::<BufferCopyArguments, _>(
        "BufferCopy",
        Api::Host,
        false,
        run_buffer_copy,
    )?;

    registry.register(
        "BufferFill",
        GROUP,
        "measures bandwidth of filling a buffer with a constant byte pattern",
        || Box::new(BufferFillArguments::new()),
    )?;
    registry.register_implementation::<BufferFillArguments, _>(
        "BufferFill",
        Api::Host,
        false,
        run_buffer_fill,
    )?;

    registry.register(
        "RegionCopy",
        GROUP,
        "measures bandwidth of copying a 3D region between buffers with configurable \
         origin and pitches",
        || Box::new(RegionCopyArguments::new()),
    )?;
    registry.register_implementation::<RegionCopyArguments, _>(
        "RegionCopy",
        Api::Host,
        false,
        run_region_copy,
    )?;

    Ok(())
}
