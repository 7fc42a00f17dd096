//! GLSL sources shared by the demos
//!
//! Positions are in pixels; the vertex stages map them to clip space with
//! the `ViewportSize` uniform.

/// Pixel-space position and colour, scaled by `ColorFactor`
pub const POSITION_COLOR_VERTEX: &str = r"#version 330 core

uniform vec2 ViewportSize;
uniform float ColorFactor;

layout (location = 0) in vec2 aPosition;
layout (location = 1) in vec3 aColor;

out vec3 vColor;

void main()
{
    float nx = aPosition.x / ViewportSize.x * 2.0 - 1.0;
    float ny = aPosition.y / ViewportSize.y * 2.0 - 1.0;
    gl_Position = vec4(nx, ny, 0.0, 1.0);
    vColor = aColor * ColorFactor;
}
";

/// Writes the interpolated vertex colour
pub const POSITION_COLOR_FRAGMENT: &str = r"#version 330 core

in vec3 vColor;
out vec4 pixelColor;

void main()
{
    pixelColor = vec4(vColor, 1.0);
}
";

/// Pixel-space position with a texture coordinate passed through
pub const POSITION_TEXTURE_VERTEX: &str = r"#version 330 core

uniform vec2 ViewportSize;

layout (location = 0) in vec2 aPosition;
layout (location = 1) in vec2 aUv;

out vec2 vUv;

void main()
{
    float nx = aPosition.x / ViewportSize.x * 2.0 - 1.0;
    float ny = aPosition.y / ViewportSize.y * 2.0 - 1.0;
    vUv = aUv;
    gl_Position = vec4(nx, ny, 0.0, 1.0);
}
";

/// Five-pointed star outline cut from half-planes in UV space
pub const STAR_FRAGMENT: &str = r"#version 330 core

uniform vec4 StarColor;

in vec2 vUv;
out vec4 pixelColor;

void main()
{
    float line0 = step((0.7 * vUv.x) - 0.1169, vUv.y);
    float line1 = step((-0.7 * vUv.x) + 0.5891, vUv.y);
    float line2 = step(vUv.y, 0.5891);
    float line3 = step(vUv.y, (3.0 * vUv.x) - 0.5);
    float line4 = step(vUv.y, (-3.0 * vUv.x) + 2.5);

    float leg0 = (1.0 - line2) * (1.0 - line4);
    float leg1 = (1.0 - line0) * (1.0 - line4);
    float leg2 = (1.0 - line0) * (1.0 - line1);
    float leg3 = (1.0 - line1) * (1.0 - line3);
    float leg4 = (1.0 - line2) * (1.0 - line3);

    pixelColor = (1.0 - leg0) * (1.0 - leg1) * (1.0 - leg2) * (1.0 - leg3) * (1.0 - leg4) * StarColor;
}
";
