mod buffer;
mod channels;
mod output;
mod resampler;
mod surface;
