//! Known frameworks in detection order, with the companion packages that
//! contribute feature tags.

#[derive(Debug, Clone, Copy)]
pub struct FrameworkDescriptor {
    /// Tag used on endpoint elements
    pub tag: &'static str,
    pub display_name: &'static str,
    /// Any of these dependency names identifies the framework
    pub packages: &'static [&'static str],
    /// `(package, feature)` pairs checked once the framework matched
    pub companions: &'static [(&'static str, &'static str)],
}

pub const CATALOG: &[FrameworkDescriptor] = &[
    FrameworkDescriptor {
        tag: "nestjs",
        display_name: "NestJS",
        packages: &["@nestjs/core", "@nestjs/common"],
        companions: &[
            ("@nestjs/passport", "authentication"),
            ("@nestjs/jwt", "authentication"),
            ("@nestjs/swagger", "openapi"),
            ("@nestjs/graphql", "graphql"),
            ("@nestjs/typeorm", "orm"),
            ("@nestjs/mongoose", "orm"),
            ("@nestjs/websockets", "websockets"),
            ("@nestjs/config", "config"),
        ],
    },
    FrameworkDescriptor {
        tag: "express",
        display_name: "Express",
        packages: &["express"],
        companions: &[
            ("express-session", "sessions"),
            ("passport", "authentication"),
            ("jsonwebtoken", "authentication"),
            ("cors", "cors"),
            ("helmet", "security"),
            ("express-validator", "validation"),
            ("multer", "uploads"),
            ("morgan", "logging"),
        ],
    },
    FrameworkDescriptor {
        tag: "fastify",
        display_name: "Fastify",
        packages: &["fastify"],
        companions: &[
            ("@fastify/session", "sessions"),
            ("@fastify/jwt", "authentication"),
            ("@fastify/cors", "cors"),
            ("@fastify/helmet", "security"),
            ("@fastify/swagger", "openapi"),
        ],
    },
    FrameworkDescriptor {
        tag: "koa",
        display_name: "Koa",
        packages: &["koa"],
        companions: &[
            ("koa-session", "sessions"),
            ("koa-passport", "authentication"),
            ("@koa/router", "routing"),
            ("koa-router", "routing"),
            ("@koa/cors", "cors"),
        ],
    },
    FrameworkDescriptor {
        tag: "hapi",
        display_name: "Hapi",
        packages: &["@hapi/hapi"],
        companions: &[
            ("@hapi/cookie", "sessions"),
            ("@hapi/jwt", "authentication"),
            ("joi", "validation"),
        ],
    },
    FrameworkDescriptor {
        tag: "hono",
        display_name: "Hono",
        packages: &["hono"],
        companions: &[
            ("@hono/zod-validator", "validation"),
            ("@hono/node-server", "node-server"),
        ],
    },
    FrameworkDescriptor {
        tag: "nextjs",
        display_name: "Next.js",
        packages: &["next"],
        companions: &[
            ("next-auth", "authentication"),
            ("@auth/nextjs", "authentication"),
            ("next-intl", "i18n"),
            ("@next/mdx", "mdx"),
            ("@prisma/client", "orm"),
        ],
    },
    FrameworkDescriptor {
        tag: "nuxt",
        display_name: "Nuxt",
        packages: &["nuxt"],
        companions: &[
            ("@sidebase/nuxt-auth", "authentication"),
            ("@pinia/nuxt", "state-management"),
            ("@nuxt/content", "content"),
            ("@nuxtjs/i18n", "i18n"),
        ],
    },
    FrameworkDescriptor {
        tag: "remix",
        display_name: "Remix",
        packages: &["@remix-run/react", "@remix-run/node"],
        companions: &[("remix-auth", "authentication")],
    },
    FrameworkDescriptor {
        tag: "sveltekit",
        display_name: "SvelteKit",
        packages: &["@sveltejs/kit"],
        companions: &[("@auth/sveltekit", "authentication")],
    },
    FrameworkDescriptor {
        tag: "astro",
        display_name: "Astro",
        packages: &["astro"],
        companions: &[
            ("@astrojs/mdx", "mdx"),
            ("@astrojs/tailwind", "tailwind"),
        ],
    },
    FrameworkDescriptor {
        tag: "react",
        display_name: "React",
        packages: &["react"],
        companions: &[
            ("react-router-dom", "routing"),
            ("react-router", "routing"),
            ("@reduxjs/toolkit", "state-management"),
            ("redux", "state-management"),
            ("zustand", "state-management"),
            ("@tanstack/react-query", "data-fetching"),
            ("react-hook-form", "forms"),
        ],
    },
    FrameworkDescriptor {
        tag: "vue",
        display_name: "Vue",
        packages: &["vue"],
        companions: &[
            ("vue-router", "routing"),
            ("pinia", "state-management"),
            ("vuex", "state-management"),
        ],
    },
    FrameworkDescriptor {
        tag: "svelte",
        display_name: "Svelte",
        packages: &["svelte"],
        companions: &[("svelte-i18n", "i18n")],
    },
    FrameworkDescriptor {
        tag: "angular",
        display_name: "Angular",
        packages: &["@angular/core"],
        companions: &[
            ("@angular/router", "routing"),
            ("@ngrx/store", "state-management"),
            ("@angular/forms", "forms"),
        ],
    },
    FrameworkDescriptor {
        tag: "solid",
        display_name: "SolidJS",
        packages: &["solid-js"],
        companions: &[("@solidjs/router", "routing")],
    },
    FrameworkDescriptor {
        tag: "preact",
        display_name: "Preact",
        packages: &["preact"],
        companions: &[
            ("preact-router", "routing"),
            ("@preact/signals", "signals"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tags_are_unique_and_cover_endpoint_conventions() {
        let tags: HashSet<_> = CATALOG.iter().map(|d| d.tag).collect();
        assert_eq!(tags.len(), CATALOG.len());
        for tag in ["nestjs", "express", "fastify", "koa", "hapi", "hono", "nextjs", "nuxt"] {
            assert!(tags.contains(tag), "{tag}");
        }
    }
}
